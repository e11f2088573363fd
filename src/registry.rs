//! Per-account plugin sets and the ledger operations that manage them.

use std::collections::HashMap ;

use crate::{ Address, Ledger, LedgerError, LedgerEvent, Plugin };
use crate::resource::ResourceMeter ;
use crate::unique_set::{ SetError, UniqueSet };



/// One bounded [`UniqueSet`] of plugin addresses per account.
///
/// Sets are created on first insertion. An emptied set is dropped, which makes
/// it indistinguishable from one that never existed.
#[derive( Debug, Clone )]
pub(crate) struct PluginRegistry {
	limit: usize,
	sets: HashMap<Address, UniqueSet<Address>>,
}

impl PluginRegistry {

	pub(crate) fn new( limit: usize ) -> Self {
		Self { limit, sets: HashMap::new() }
	}

	pub(crate) fn set( &self, account: &Address ) -> Option<&UniqueSet<Address>> { self.sets.get( account ) }

	pub(crate) fn plugins( &self, account: &Address ) -> Vec<Address> {
		self.sets.get( account ).map( UniqueSet::items ).unwrap_or_default()
	}

	pub(crate) fn contains( &self, account: &Address, plugin: &Address ) -> bool {
		self.sets.get( account ).is_some_and(| set | set.contains( plugin ))
	}

	pub(crate) fn count( &self, account: &Address ) -> usize {
		self.sets.get( account ).map_or( 0, UniqueSet::len )
	}

	pub(crate) fn at( &self, account: &Address, index: usize ) -> Result<Address, SetError> {
		match self.sets.get( account ) {
			Some( set ) => set.at( index ),
			None => Err( SetError::IndexOutOfRange { index, length: 0 }),
		}
	}

	/// Appends `plugin`, then checks the limit. An insertion that overflows
	/// is undone before the error is returned.
	pub(crate) fn insert( &mut self, account: Address, plugin: Address ) -> Result<(), LedgerError> {
		let set = self.sets.entry( account ).or_default();
		if !set.add( plugin ) {
			return Err( LedgerError::PluginAlreadyRegistered { account, plugin })
		}
		if set.len() > self.limit {
			set.remove( &plugin );
			self.prune( &account );
			return Err( LedgerError::PluginLimitExceeded { account, limit: self.limit })
		}
		Ok(())
	}

	pub(crate) fn remove( &mut self, account: Address, plugin: Address ) -> Result<(), LedgerError> {
		let removed = self.sets.get_mut( &account ).is_some_and(| set | set.remove( &plugin ));
		self.prune( &account );
		match removed {
			true => Ok(()),
			false => Err( LedgerError::PluginNotRegistered { account, plugin }),
		}
	}

	pub(crate) fn clear( &mut self, account: &Address ) {
		self.sets.remove( account );
	}

	/// Puts back a previously captured set.
	pub(crate) fn restore( &mut self, account: Address, set: UniqueSet<Address> ) {
		match set.is_empty() {
			true => { self.sets.remove( &account ); }
			false => { self.sets.insert( account, set ); }
		}
	}

	fn prune( &mut self, account: &Address ) {
		if self.sets.get( account ).is_some_and( UniqueSet::is_empty ) {
			self.sets.remove( account );
		}
	}

}

impl<P: Plugin> Ledger<P> {

	/// Opts `account` into `plugin`.
	///
	/// If the account already holds a balance, the plugin immediately receives it
	/// as a credit from `None`.
	///
	/// # Errors
	/// - [`LedgerError::InvalidAccount`] if `account` is the zero address
	/// - [`LedgerError::InvalidPluginIdentifier`] if `plugin` is the zero address
	/// - [`LedgerError::UnknownPlugin`] if nothing is installed at `plugin`
	/// - [`LedgerError::PluginBindingMismatch`] if the plugin serves another ledger
	/// - [`LedgerError::PluginAlreadyRegistered`] if the account already holds it
	/// - [`LedgerError::PluginLimitExceeded`] if the account is at its limit
	/// - any error escalated from the synchronising call
	pub fn add_plugin( &self, meter: &mut ResourceMeter, account: Address, plugin: Address ) -> Result<(), LedgerError> {
		self.atomically(|| {
			if account.is_zero() { return Err( LedgerError::InvalidAccount( account )) }
			if plugin.is_zero() { return Err( LedgerError::InvalidPluginIdentifier ) }

			let bound = self.with_plugin( plugin, | instance | instance.bound_ledger() )?;
			if bound != self.id() {
				return Err( LedgerError::PluginBindingMismatch { plugin, bound, expected: self.id() })
			}

			self.update_plugin_set( account, | registry | registry.insert( account, plugin ))?;
			self.emit( LedgerEvent::PluginAdded { account, plugin });

			let balance = self.stored_balance( &account );
			if balance > 0 {
				self.invoke_plugin( meter, plugin, None, Some( account ), balance )?;
			}
			Ok(())
		})
	}

	/// Opts `account` out of `plugin`.
	///
	/// If the account holds a balance, the plugin receives it as a debit to `None`.
	///
	/// # Errors
	/// - [`LedgerError::PluginNotRegistered`] if the account does not hold it
	/// - any error escalated from the synchronising call
	pub fn remove_plugin( &self, meter: &mut ResourceMeter, account: Address, plugin: Address ) -> Result<(), LedgerError> {
		self.atomically(|| {
			self.update_plugin_set( account, | registry | registry.remove( account, plugin ))?;
			self.emit( LedgerEvent::PluginRemoved { account, plugin });

			let balance = self.stored_balance( &account );
			if balance > 0 {
				self.invoke_plugin( meter, plugin, Some( account ), None, balance )?;
			}
			Ok(())
		})
	}

	/// Opts `account` out of every plugin it holds, newest first.
	///
	/// Walking the snapshot from the end keeps swap-removal from skipping or
	/// revisiting entries.
	///
	/// # Errors
	/// Any error escalated from a synchronising call.
	pub fn remove_all_plugins( &self, meter: &mut ResourceMeter, account: Address ) -> Result<(), LedgerError> {
		self.atomically(|| {
			let plugins = self.state.borrow().registry.plugins( &account );
			let balance = self.stored_balance( &account );

			for plugin in plugins.into_iter().rev() {
				self.update_plugin_set( account, | registry | registry.remove( account, plugin ))?;
				self.emit( LedgerEvent::PluginRemoved { account, plugin });
				if balance > 0 {
					self.invoke_plugin( meter, plugin, Some( account ), None, balance )?;
				}
			}

			self.update_plugin_set( account, | registry | {
				registry.clear( &account );
				Ok(())
			})
		})
	}

	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn has_plugin( &self, account: Address, plugin: Address ) -> Result<bool, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().registry.contains( &account, &plugin ))
	}

	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn plugins_count( &self, account: Address ) -> Result<usize, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().registry.count( &account ))
	}

	/// # Errors
	/// Fails with [`LedgerError::IndexOutOfRange`] if `index >= plugins_count( account )`,
	/// or with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn plugin_at( &self, account: Address, index: usize ) -> Result<Address, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().registry.at( &account, index )? )
	}

	/// Snapshot of the plugins `account` holds. Order is deterministic but
	/// not stable across removals.
	///
	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn plugins( &self, account: Address ) -> Result<Vec<Address>, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().registry.plugins( &account ))
	}

}

#[cfg( test )]
mod tests {
	use super::* ;

	fn addr( n: u64 ) -> Address { Address::from_low_u64( n ) }

	#[test]
	fn insert_over_limit_is_undone() {
		let mut registry = PluginRegistry::new( 2 );
		assert!( registry.insert( addr( 1 ), addr( 10 )).is_ok() );
		assert!( registry.insert( addr( 1 ), addr( 11 )).is_ok() );
		assert_eq!(
			registry.insert( addr( 1 ), addr( 12 )),
			Err( LedgerError::PluginLimitExceeded { account: addr( 1 ), limit: 2 }),
		);
		assert_eq!( registry.plugins( &addr( 1 )), vec![ addr( 10 ), addr( 11 )]);
	}

	#[test]
	fn duplicate_is_reported_before_limit() {
		let mut registry = PluginRegistry::new( 1 );
		assert!( registry.insert( addr( 1 ), addr( 10 )).is_ok() );
		assert_eq!(
			registry.insert( addr( 1 ), addr( 10 )),
			Err( LedgerError::PluginAlreadyRegistered { account: addr( 1 ), plugin: addr( 10 )}),
		);
	}

	#[test]
	fn emptied_set_is_dropped() {
		let mut registry = PluginRegistry::new( 3 );
		assert!( registry.insert( addr( 1 ), addr( 10 )).is_ok() );
		assert!( registry.remove( addr( 1 ), addr( 10 )).is_ok() );
		assert!( registry.set( &addr( 1 )).is_none() );
		assert_eq!( registry.at( &addr( 1 ), 0 ), Err( SetError::IndexOutOfRange { index: 0, length: 0 }));
		assert_eq!(
			registry.remove( addr( 1 ), addr( 10 )),
			Err( LedgerError::PluginNotRegistered { account: addr( 1 ), plugin: addr( 10 )}),
		);
	}

	#[test]
	fn limit_of_one_rejected_second_leaves_no_empty_set() {
		let mut registry = PluginRegistry::new( 1 );
		assert!( registry.insert( addr( 2 ), addr( 10 )).is_ok() );
		assert!( registry.insert( addr( 2 ), addr( 11 )).is_err() );
		assert_eq!( registry.count( &addr( 2 )), 1 );
		assert!( registry.contains( &addr( 2 ), &addr( 10 )));
	}
}
