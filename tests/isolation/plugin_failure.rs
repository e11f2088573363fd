use ledger_plugins::LedgerEvent ;
use crate::fixtures::{ self, Behaviour, addr };

#[test]
fn failing_plugin_does_not_block_transfer() {
	fixtures::init_tracing();
	let ledger = fixtures::default_ledger();
	let failing = fixtures::install( &ledger, 100, Behaviour::Fail );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();
	ledger.mint( &mut meter, x, 100 ).expect( "mint succeeds" );
	ledger.add_plugin( &mut meter, x, failing ).expect( "add succeeds despite failing sync" );
	ledger.add_plugin( &mut meter, y, failing ).expect( "add succeeds" );

	ledger.transfer( &mut meter, x, y, 40 ).expect( "transfer succeeds" );
	ledger.transfer( &mut meter, y, x, 10 ).expect( "transfer succeeds" );

	assert_eq!( ledger.balance_of( x ), Ok( 70 ));
	assert_eq!( ledger.balance_of( y ), Ok( 30 ));
	assert_eq!( ledger.plugins( x ), Ok( vec![ failing ]));

	ledger.remove_plugin( &mut meter, x, failing ).expect( "remove succeeds despite failing sync" );
	assert_eq!( ledger.events().map(| events | events.iter()
		.filter(| event | !matches!( event, LedgerEvent::Transfer { .. }))
		.count()
	), Ok( 3 ));
}

#[test]
fn failed_call_leaves_no_trace_in_the_plugin() {
	let ledger = fixtures::default_ledger();
	let failing = fixtures::install( &ledger, 100, Behaviour::Fail );
	let mut meter = fixtures::meter();
	ledger.add_plugin( &mut meter, addr( 1 ), failing ).expect( "add succeeds" );

	ledger.mint( &mut meter, addr( 1 ), 5 ).expect( "mint succeeds" );

	assert_eq!( fixtures::received( &ledger, failing ), vec![]);
}

#[test]
fn healthy_plugins_are_still_notified() {
	let ledger = fixtures::default_ledger();
	let failing = fixtures::install( &ledger, 100, Behaviour::Fail );
	let healthy = fixtures::install( &ledger, 101, Behaviour::Record );
	let ( x, y ) = ( addr( 1 ), addr( 2 ));
	let mut meter = fixtures::meter();
	ledger.add_plugin( &mut meter, x, failing ).expect( "add succeeds" );
	ledger.add_plugin( &mut meter, x, healthy ).expect( "add succeeds" );
	ledger.mint( &mut meter, x, 8 ).expect( "mint succeeds" );

	ledger.transfer( &mut meter, x, y, 3 ).expect( "transfer succeeds" );

	assert_eq!( fixtures::received( &ledger, healthy ), vec![
		( None, Some( x ), 8 ),
		( Some( x ), None, 3 ),
	]);
}
