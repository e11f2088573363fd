use ledger_plugins::{ LedgerError, LedgerEvent };
use crate::fixtures::{ self, Behaviour, addr };

#[test]
fn remove_plugin_unregisters_and_emits() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	let account = addr( 1 );
	let mut meter = fixtures::meter();

	ledger.add_plugin( &mut meter, account, plugin ).expect( "add succeeds" );
	ledger.remove_plugin( &mut meter, account, plugin ).expect( "remove succeeds" );

	assert_eq!( ledger.has_plugin( account, plugin ), Ok( false ));
	assert_eq!( ledger.plugins_count( account ), Ok( 0 ));
	assert_eq!( ledger.events(), Ok( vec![
		LedgerEvent::PluginAdded { account, plugin },
		LedgerEvent::PluginRemoved { account, plugin },
	]));
}

#[test]
fn removing_absent_plugin_fails() {
	let ledger = fixtures::default_ledger();
	let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
	match ledger.remove_plugin( &mut fixtures::meter(), addr( 1 ), plugin ) {
		Err( LedgerError::PluginNotRegistered { account, plugin: reported }) => {
			assert_eq!( account, addr( 1 ));
			assert_eq!( reported, plugin );
		}
		other => panic!( "Expected PluginNotRegistered, got: {:#?}", other ),
	}
	assert_eq!( ledger.events(), Ok( vec![] ));
}

#[test]
fn remove_keeps_other_plugins() {
	let ledger = fixtures::default_ledger();
	let first = fixtures::install( &ledger, 100, Behaviour::Record );
	let second = fixtures::install( &ledger, 101, Behaviour::Record );
	let third = fixtures::install( &ledger, 102, Behaviour::Record );
	let mut meter = fixtures::meter();
	for plugin in [ first, second, third ] {
		ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );
	}

	ledger.remove_plugin( &mut meter, addr( 1 ), first ).expect( "remove succeeds" );

	// Swap-removal reorders, so only membership is checked
	let mut remaining = ledger.plugins( addr( 1 )).expect( "read succeeds" );
	remaining.sort();
	assert_eq!( remaining, vec![ second, third ]);
}
