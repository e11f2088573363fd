use crate::fixtures::{ self, Behaviour, addr };

#[test]
fn transfer_between_holders_is_notified_once() {
	fixtures::init_tracing();
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();

	ledger.mint( &mut meter, x, 100 ).expect( "mint succeeds" );
	ledger.add_plugin( &mut meter, x, plugin ).expect( "add succeeds" );
	ledger.add_plugin( &mut meter, y, plugin ).expect( "add succeeds" );
	ledger.transfer( &mut meter, x, y, 40 ).expect( "transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![
		( None, Some( x ), 100 ),
		( Some( x ), Some( y ), 40 ),
	]);
	assert_eq!( ledger.balance_of( x ), Ok( 60 ));
	assert_eq!( ledger.balance_of( y ), Ok( 40 ));
	assert_eq!( ledger.plugin_balance_of( plugin, x ), Ok( 60 ));
	assert_eq!( ledger.plugin_balance_of( plugin, y ), Ok( 40 ));

	let mirror = ledger.plugin( plugin ).expect( "plugin is installed" );
	assert_eq!( mirror.balance( x ), 60 );
	assert_eq!( mirror.balance( y ), 40 );
}

#[test]
fn every_plugin_of_either_side_is_visited_exactly_once() {
	let ledger = fixtures::default_ledger();
	let shared = fixtures::install( &ledger, 100, Behaviour::Record );
	let sender_only = fixtures::install( &ledger, 101, Behaviour::Record );
	let receiver_only = fixtures::install( &ledger, 102, Behaviour::Record );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();

	ledger.add_plugin( &mut meter, x, sender_only ).expect( "add succeeds" );
	ledger.add_plugin( &mut meter, x, shared ).expect( "add succeeds" );
	ledger.add_plugin( &mut meter, y, shared ).expect( "add succeeds" );
	ledger.add_plugin( &mut meter, y, receiver_only ).expect( "add succeeds" );
	ledger.mint( &mut meter, x, 10 ).expect( "mint succeeds" );
	ledger.transfer( &mut meter, x, y, 4 ).expect( "transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, shared ), vec![( None, Some( x ), 10 ), ( Some( x ), Some( y ), 4 )]);
	assert_eq!( fixtures::received( &ledger, sender_only ), vec![( None, Some( x ), 10 ), ( Some( x ), None, 4 )]);
	assert_eq!( fixtures::received( &ledger, receiver_only ), vec![( None, Some( y ), 4 )]);
}

#[test]
fn self_transfer_and_zero_amount_notify_nobody() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let x = addr( 1 );
	let mut meter = fixtures::meter();
	ledger.add_plugin( &mut meter, x, plugin ).expect( "add succeeds" );
	ledger.mint( &mut meter, x, 10 ).expect( "mint succeeds" );

	ledger.transfer( &mut meter, x, x, 5 ).expect( "self transfer succeeds" );
	ledger.transfer( &mut meter, x, addr( 2 ), 0 ).expect( "zero transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![( None, Some( x ), 10 )]);
	assert_eq!( ledger.balance_of( x ), Ok( 10 ));
}
