use crate::fixtures::{ self, Behaviour, addr };

#[test]
fn sender_only_plugin_sees_debit_to_none() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();
	ledger.mint( &mut meter, x, 100 ).expect( "mint succeeds" );
	ledger.add_plugin( &mut meter, x, plugin ).expect( "add succeeds" );

	ledger.transfer( &mut meter, x, y, 40 ).expect( "transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ).last(), Some( &( Some( x ), None, 40 )));
	assert_eq!( ledger.plugin_balance_of( plugin, x ), Ok( 60 ));
	assert_eq!( ledger.plugin_balance_of( plugin, y ), Ok( 0 ));
	assert_eq!( ledger.balance_of( y ), Ok( 40 ));
}

#[test]
fn receiver_only_plugin_sees_credit_from_none() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();
	ledger.mint( &mut meter, x, 100 ).expect( "mint succeeds" );
	ledger.add_plugin( &mut meter, y, plugin ).expect( "add succeeds" );

	ledger.transfer( &mut meter, x, y, 40 ).expect( "transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![( None, Some( y ), 40 )]);
	assert_eq!( ledger.plugin( plugin ).map(| p | p.balance( y )), Ok( 40 ));
}
