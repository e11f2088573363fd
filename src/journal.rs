//! Undo log backing the all-or-nothing commit of every mutation.
//!
//! The first write to any piece of state inside an exclusive section records
//! the value it replaces. Dropping the journal commits; [`Journal::undo`]
//! puts every recorded value back.

use std::collections::HashMap ;
use std::collections::hash_map::Entry ;

use crate::Address ;
use crate::ledger::LedgerState ;
use crate::unique_set::UniqueSet ;



#[derive( Debug )]
pub(crate) struct Journal<P> {
	balances: HashMap<Address, u128>,
	total_supply: Option<u128>,
	plugin_sets: HashMap<Address, UniqueSet<Address>>,
	events_len: usize,
	plugins: HashMap<Address, P>,
}

impl<P> Journal<P> {

	pub(crate) fn new( events_len: usize ) -> Self {
		Self {
			balances: HashMap::new(),
			total_supply: None,
			plugin_sets: HashMap::new(),
			events_len,
			plugins: HashMap::new(),
		}
	}

	pub(crate) fn record_balance( &mut self, account: Address, prior: u128 ) {
		self.balances.entry( account ).or_insert( prior );
	}

	pub(crate) fn record_total_supply( &mut self, prior: u128 ) {
		self.total_supply.get_or_insert( prior );
	}

	pub(crate) fn record_plugin_set( &mut self, account: Address, prior: impl FnOnce() -> UniqueSet<Address> ) {
		if let Entry::Vacant( entry ) = self.plugin_sets.entry( account ) {
			entry.insert( prior() );
		}
	}

	pub(crate) fn record_plugin( &mut self, plugin: Address, prior: impl FnOnce() -> P ) {
		if let Entry::Vacant( entry ) = self.plugins.entry( plugin ) {
			entry.insert( prior() );
		}
	}

	pub(crate) fn undo( self, state: &mut LedgerState, plugins: &mut HashMap<Address, P> ) {
		self.balances.into_iter().for_each(|( account, balance )| state.put_balance( account, balance ));
		if let Some( total_supply ) = self.total_supply { state.total_supply = total_supply ; }
		self.plugin_sets.into_iter().for_each(|( account, set )| state.registry.restore( account, set ));
		state.events.truncate( self.events_len );
		plugins.extend( self.plugins );
	}

}

#[cfg( test )]
mod tests {
	use super::* ;
	use crate::LedgerEvent ;

	fn addr( n: u64 ) -> Address { Address::from_low_u64( n ) }

	#[test]
	fn only_first_write_is_recorded() {
		let mut state = LedgerState::new( 4 );
		state.put_balance( addr( 1 ), 10 );

		let mut journal = Journal::<u32>::new( 0 );
		journal.record_balance( addr( 1 ), 10 );
		state.put_balance( addr( 1 ), 20 );
		journal.record_balance( addr( 1 ), 20 );
		state.put_balance( addr( 1 ), 30 );
		journal.record_balance( addr( 2 ), 0 );
		state.put_balance( addr( 2 ), 5 );

		let mut plugins = HashMap::new();
		journal.undo( &mut state, &mut plugins );
		assert_eq!( state.balance( &addr( 1 )), 10 );
		assert_eq!( state.balance( &addr( 2 )), 0 );
	}

	#[test]
	fn undo_restores_sets_events_and_plugins() {
		let mut state = LedgerState::new( 4 );
		let mut plugins = HashMap::from([( addr( 9 ), 1u32 )]);
		state.events.push( LedgerEvent::Transfer { from: None, to: Some( addr( 1 )), amount: 1 });

		let mut journal = Journal::new( state.events.len() );
		journal.record_plugin_set( addr( 1 ), || state.registry.set( &addr( 1 )).cloned().unwrap_or_default() );
		state.registry.insert( addr( 1 ), addr( 9 )).expect( "fresh set accepts a plugin" );
		state.events.push( LedgerEvent::PluginAdded { account: addr( 1 ), plugin: addr( 9 )});
		journal.record_plugin( addr( 9 ), || 1 );
		plugins.insert( addr( 9 ), 2 );
		journal.record_plugin( addr( 9 ), || 2 );

		journal.undo( &mut state, &mut plugins );
		assert_eq!( state.registry.count( &addr( 1 )), 0 );
		assert_eq!( state.events.len(), 1 );
		assert_eq!( plugins.get( &addr( 9 )), Some( &1 ));
	}
}
