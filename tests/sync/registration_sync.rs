use crate::fixtures::{ self, Behaviour, addr };

#[test]
fn adding_to_funded_account_credits_full_balance() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let mut meter = fixtures::meter();
	ledger.mint( &mut meter, addr( 1 ), 75 ).expect( "mint succeeds" );

	ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![( None, Some( addr( 1 )), 75 )]);
}

#[test]
fn adding_to_empty_account_is_silent() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let mut meter = fixtures::meter();

	ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![]);
	assert_eq!( meter.consumed(), 0 );
}

#[test]
fn removing_from_funded_account_debits_full_balance() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let mut meter = fixtures::meter();
	ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );
	ledger.mint( &mut meter, addr( 1 ), 75 ).expect( "mint succeeds" );

	ledger.remove_plugin( &mut meter, addr( 1 ), plugin ).expect( "remove succeeds" );

	assert_eq!( fixtures::received( &ledger, plugin ), vec![
		( None, Some( addr( 1 )), 75 ),
		( Some( addr( 1 )), None, 75 ),
	]);
	assert_eq!( ledger.plugin( plugin ).map(| p | p.balance( addr( 1 ))), Ok( 0 ));
}

#[test]
fn calls_are_charged_to_the_caller() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let mut meter = fixtures::meter();
	ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );

	ledger.mint( &mut meter, addr( 1 ), 1 ).expect( "mint succeeds" );

	assert_eq!( meter.consumed(), ledger_plugins::CALL_ENTRY_COST + fixtures::NOTIFY_COST );
}
