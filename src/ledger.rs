//! The primary ledger and the state handle every core component works through.

use std::cell::RefCell ;
use std::collections::HashMap ;
use tracing::{ debug, info, warn };

use crate::{ Address, LedgerConfig, LedgerError, LedgerEvent, Plugin };
use crate::config::ConfigError ;
use crate::guard::ReentrancyGuard ;
use crate::journal::Journal ;
use crate::registry::PluginRegistry ;
use crate::resource::ResourceMeter ;



/// Layout version of [`LedgerState`]. Bumped whenever the state shape changes.
pub const STATE_VERSION: u32 = 1 ;

/// All mutable ledger state, reachable only through the owning [`Ledger`].
#[derive( Debug, Clone )]
pub(crate) struct LedgerState {
	pub(crate) version: u32,
	balances: HashMap<Address, u128>,
	pub(crate) total_supply: u128,
	pub(crate) registry: PluginRegistry,
	pub(crate) events: Vec<LedgerEvent>,
}

impl LedgerState {

	pub(crate) fn new( plugins_limit: usize ) -> Self {
		Self {
			version: STATE_VERSION,
			balances: HashMap::new(),
			total_supply: 0,
			registry: PluginRegistry::new( plugins_limit ),
			events: Vec::new(),
		}
	}

	#[inline] pub(crate) fn balance( &self, account: &Address ) -> u128 {
		self.balances.get( account ).copied().unwrap_or( 0 )
	}

	pub(crate) fn put_balance( &mut self, account: Address, balance: u128 ) {
		match balance {
			0 => { self.balances.remove( &account ); }
			_ => { self.balances.insert( account, balance ); }
		}
	}

}

/// A balance ledger that notifies opted-in plugins of every balance change.
///
/// The ledger is single-threaded by construction: all entry points take `&self`
/// and are serialised by a [`ReentrancyGuard`]. Mutations run exclusively and
/// are all-or-nothing; reads are refused while a mutation is in flight, which
/// is only ever observable from inside a plugin callback.
///
/// Plugins are installed into the ledger's plugin table at an address and
/// referenced by that address from then on.
pub struct Ledger<P: Plugin> {
	id: Address,
	config: LedgerConfig,
	pub(crate) guard: ReentrancyGuard,
	pub(crate) state: RefCell<LedgerState>,
	plugins: RefCell<HashMap<Address, P>>,
	journal: RefCell<Option<Journal<P>>>,
}

impl<P: Plugin> Ledger<P> {

	/// Creates an empty ledger identified by `id`.
	///
	/// # Errors
	/// Fails with [`ConfigError::ZeroPluginsLimit`] if the config does not validate.
	pub fn new( id: Address, config: LedgerConfig ) -> Result<Self, ConfigError> {
		config.validate()?;
		debug!( ledger = %id, ?config, "Ledger initialised" );
		Ok( Self {
			id,
			config,
			guard: ReentrancyGuard::new(),
			state: RefCell::new( LedgerState::new( config.plugins_limit() )),
			plugins: RefCell::new( HashMap::new() ),
			journal: RefCell::new( None ),
		})
	}

	/// Identifier plugins must report from [`Plugin::bound_ledger`].
	#[inline] pub fn id( &self ) -> Address { self.id }

	#[inline] pub fn config( &self ) -> &LedgerConfig { &self.config }

	pub fn state_version( &self ) -> u32 { self.state.borrow().version }

	/// Makes `plugin` reachable at `address`. Installing does not opt any account in.
	///
	/// # Errors
	/// - [`LedgerError::InvalidPluginIdentifier`] if `address` is the zero address
	/// - [`LedgerError::PluginAddressInUse`] if something is already installed there
	/// - [`LedgerError::ReentrancyDetected`] during a mutation
	pub fn install_plugin( &self, address: Address, plugin: P ) -> Result<(), LedgerError> {
		let _section = self.guard.enter_exclusive()?;
		if address.is_zero() { return Err( LedgerError::InvalidPluginIdentifier ) }
		let mut plugins = self.plugins.borrow_mut();
		if plugins.contains_key( &address ) { return Err( LedgerError::PluginAddressInUse( address )) }
		plugins.insert( address, plugin );
		debug!( ledger = %self.id, plugin = %address, "Plugin installed" );
		Ok(())
	}

	/// Copy of the current state of the plugin installed at `address`.
	///
	/// # Errors
	/// Fails with [`LedgerError::UnknownPlugin`] if nothing is installed there,
	/// or with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn plugin( &self, address: Address ) -> Result<P, LedgerError> {
		self.guard.check_shared()?;
		self.with_plugin( address, P::clone )
	}

	/// Creates `amount` and credits it to `to`.
	///
	/// # Errors
	/// [`LedgerError::InvalidAccount`], [`LedgerError::BalanceOverflow`], or any
	/// error escalated while notifying plugins.
	pub fn mint( &self, meter: &mut ResourceMeter, to: Address, amount: u128 ) -> Result<(), LedgerError> {
		self.atomically(|| {
			if to.is_zero() { return Err( LedgerError::InvalidAccount( to )) }
			let supply = self.state.borrow().total_supply.checked_add( amount ).ok_or( LedgerError::BalanceOverflow )?;
			self.set_total_supply( supply );
			self.credit( to, amount )?;
			self.emit( LedgerEvent::Transfer { from: None, to: Some( to ), amount });
			self.sync_balances( meter, None, Some( to ), amount )
		})
	}

	/// Destroys `amount` out of `from`.
	///
	/// # Errors
	/// [`LedgerError::InvalidAccount`], [`LedgerError::InsufficientBalance`], or any
	/// error escalated while notifying plugins.
	pub fn burn( &self, meter: &mut ResourceMeter, from: Address, amount: u128 ) -> Result<(), LedgerError> {
		self.atomically(|| {
			if from.is_zero() { return Err( LedgerError::InvalidAccount( from )) }
			self.debit( from, amount )?;
			let supply = self.state.borrow().total_supply.saturating_sub( amount );
			self.set_total_supply( supply );
			self.emit( LedgerEvent::Transfer { from: Some( from ), to: None, amount });
			self.sync_balances( meter, Some( from ), None, amount )
		})
	}

	/// Moves `amount` from `from` to `to`.
	///
	/// # Errors
	/// [`LedgerError::InvalidAccount`], [`LedgerError::InsufficientBalance`], or any
	/// error escalated while notifying plugins. On error neither balance changes.
	pub fn transfer( &self, meter: &mut ResourceMeter, from: Address, to: Address, amount: u128 ) -> Result<(), LedgerError> {
		self.atomically(|| {
			if from.is_zero() { return Err( LedgerError::InvalidAccount( from )) }
			if to.is_zero() { return Err( LedgerError::InvalidAccount( to )) }
			self.debit( from, amount )?;
			self.credit( to, amount )?;
			self.emit( LedgerEvent::Transfer { from: Some( from ), to: Some( to ), amount });
			self.sync_balances( meter, Some( from ), Some( to ), amount )
		})
	}

	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn balance_of( &self, account: Address ) -> Result<u128, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.stored_balance( &account ))
	}

	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn total_supply( &self ) -> Result<u128, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().total_supply )
	}

	/// Balance of `account` as seen by `plugin`: the full balance if the account
	/// holds the plugin, zero otherwise. Derived on demand, never stored.
	///
	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn plugin_balance_of( &self, plugin: Address, account: Address ) -> Result<u128, LedgerError> {
		self.guard.check_shared()?;
		let state = self.state.borrow();
		Ok( match state.registry.contains( &account, &plugin ) {
			true => state.balance( &account ),
			false => 0,
		})
	}

	/// Events recorded so far, oldest first.
	///
	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn events( &self ) -> Result<Vec<LedgerEvent>, LedgerError> {
		self.guard.check_shared()?;
		Ok( self.state.borrow().events.clone() )
	}

	/// Takes every recorded event, leaving the log empty.
	///
	/// # Errors
	/// Fails with [`LedgerError::ReentrancyDetected`] during a mutation.
	pub fn drain_events( &self ) -> Result<Vec<LedgerEvent>, LedgerError> {
		self.guard.check_shared()?;
		Ok( std::mem::take( &mut self.state.borrow_mut().events ))
	}

	/// Runs `operation` inside an exclusive section. If it fails, every write it
	/// made is undone before the error is returned.
	pub(crate) fn atomically<T>( &self, operation: impl FnOnce() -> Result<T, LedgerError> ) -> Result<T, LedgerError> {
		let _section = self.guard.enter_exclusive()?;
		let events_len = self.state.borrow().events.len();
		*self.journal.borrow_mut() = Some( Journal::new( events_len ));

		let result = operation();

		let journal = self.journal.borrow_mut().take();
		if let ( Err( error ), Some( journal )) = ( &result, journal ) {
			warn!( ledger = %self.id, %error, "Mutation rolled back" );
			journal.undo( &mut self.state.borrow_mut(), &mut self.plugins.borrow_mut() );
		}
		result
	}

	#[inline] pub(crate) fn stored_balance( &self, account: &Address ) -> u128 {
		self.state.borrow().balance( account )
	}

	fn set_balance( &self, account: Address, balance: u128 ) {
		let mut state = self.state.borrow_mut();
		if let Some( journal ) = self.journal.borrow_mut().as_mut() {
			journal.record_balance( account, state.balance( &account ));
		}
		state.put_balance( account, balance );
	}

	fn set_total_supply( &self, supply: u128 ) {
		let mut state = self.state.borrow_mut();
		if let Some( journal ) = self.journal.borrow_mut().as_mut() {
			journal.record_total_supply( state.total_supply );
		}
		state.total_supply = supply ;
	}

	fn credit( &self, account: Address, amount: u128 ) -> Result<(), LedgerError> {
		let balance = self.stored_balance( &account ).checked_add( amount ).ok_or( LedgerError::BalanceOverflow )?;
		self.set_balance( account, balance );
		Ok(())
	}

	fn debit( &self, account: Address, amount: u128 ) -> Result<(), LedgerError> {
		let balance = self.stored_balance( &account );
		let remaining = balance.checked_sub( amount ).ok_or( LedgerError::InsufficientBalance { account, balance, needed: amount })?;
		self.set_balance( account, remaining );
		Ok(())
	}

	/// Applies `update` to the registry, recording the account's set first.
	pub(crate) fn update_plugin_set<T>(
		&self,
		account: Address,
		update: impl FnOnce( &mut PluginRegistry ) -> Result<T, LedgerError>,
	) -> Result<T, LedgerError> {
		let mut state = self.state.borrow_mut();
		if let Some( journal ) = self.journal.borrow_mut().as_mut() {
			journal.record_plugin_set( account, || state.registry.set( &account ).cloned().unwrap_or_default() );
		}
		update( &mut state.registry )
	}

	pub(crate) fn emit( &self, event: LedgerEvent ) {
		info!( ledger = %self.id, %event, "Event" );
		self.state.borrow_mut().events.push( event );
	}

	pub(crate) fn with_plugin<T>( &self, address: Address, read: impl FnOnce( &P ) -> T ) -> Result<T, LedgerError> {
		self.plugins.borrow().get( &address ).map( read ).ok_or( LedgerError::UnknownPlugin( address ))
	}

	/// Takes the plugin out of the table for the duration of a call. Its prior
	/// state is recorded so a failed mutation can restore it.
	pub(crate) fn checkout_plugin( &self, address: Address ) -> Result<P, LedgerError> {
		let instance = self.plugins.borrow_mut().remove( &address ).ok_or( LedgerError::UnknownPlugin( address ))?;
		if let Some( journal ) = self.journal.borrow_mut().as_mut() {
			journal.record_plugin( address, || instance.clone() );
		}
		Ok( instance )
	}

	pub(crate) fn checkin_plugin( &self, address: Address, instance: P ) {
		self.plugins.borrow_mut().insert( address, instance );
	}

}

impl<P: Plugin> std::fmt::Debug for Ledger<P> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Ledger" )
			.field( "id", &self.id )
			.field( "config", &self.config )
			.field( "guard", &self.guard.state() )
			.field( "plugins", &self.plugins.try_borrow().map_or( 0, | plugins | plugins.len() ))
			.finish_non_exhaustive()
	}
}
