//! The observer contract a plugin implements.
//!
//! A plugin is opaque to the ledger apart from two things: the ledger instance
//! it declares itself bound to, and a single callback receiving balance
//! changes of the accounts that opted it in.

use thiserror::Error ;

use crate::{ Address, Ledger, LedgerError };
use crate::resource::{ OutOfResources, ResourceMeter };



/// An external observer of balance changes.
///
/// Plugin state lives inside the ledger's plugin table so that it can be rolled
/// back together with the mutation that changed it; this is why plugins must
/// be [`Clone`].
///
/// # Example
///
/// ```
/// use ledger_plugins::{ Address, Plugin, PluginCall, PluginFailure };
///
/// #[derive( Clone )]
/// struct Counter { ledger: Address, calls: u32 }
///
/// impl Plugin for Counter {
/// 	fn bound_ledger( &self ) -> Address { self.ledger }
/// 	fn update_balances(
/// 		&mut self,
/// 		call: &mut PluginCall<'_, Self>,
/// 		_from: Option<Address>,
/// 		_to: Option<Address>,
/// 		_amount: u128,
/// 	) -> Result<(), PluginFailure> {
/// 		call.consume( 1_000 )?;
/// 		self.calls += 1 ;
/// 		Ok(())
/// 	}
/// }
/// ```
pub trait Plugin: Clone + 'static {

	/// Identifier of the ledger instance this plugin expects to serve.
	/// Checked once, on registration.
	fn bound_ledger( &self ) -> Address ;

	/// Receives a balance change. `None` on either side marks an account that
	/// does not hold this plugin; `from` and `to` are never both `None`.
	///
	/// Work must be paid for through [`PluginCall::consume`]. Returning an error
	/// does not block the balance change unless the caller was starved of resources.
	///
	/// # Errors
	/// Any [`PluginFailure`]; ordinary failures are absorbed by the ledger.
	fn update_balances(
		&mut self,
		call: &mut PluginCall<'_, Self>,
		from: Option<Address>,
		to: Option<Address>,
		amount: u128,
	) -> Result<(), PluginFailure> ;

}

/// A failure raised inside a plugin callback.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum PluginFailure {
	/// The plugin chose to fail.
	#[error( "Reverted: {0}" )] Reverted( String ),
	/// The plugin's allowance ran out.
	#[error( "{0}" )] OutOfResources( #[from] OutOfResources ),
	/// The plugin called back into the ledger and was refused.
	#[error( "Ledger Call Rejected: {0}" )] Ledger( Box<LedgerError> ),
}

impl PluginFailure {
	/// Short name of the failure, safe to log without copying plugin data.
	pub fn kind( &self ) -> &'static str { match self {
		Self::Reverted( _ ) => "reverted",
		Self::OutOfResources( _ ) => "out-of-resources",
		Self::Ledger( _ ) => "ledger-call-rejected",
	}}
}

impl From<LedgerError> for PluginFailure {
	fn from( error: LedgerError ) -> Self { Self::Ledger( Box::new( error )) }
}

/// Context handed to [`Plugin::update_balances`].
pub struct PluginCall<'a, P: Plugin> {
	pub(crate) ledger: &'a Ledger<P>,
	pub(crate) plugin: Address,
	pub(crate) meter: &'a mut ResourceMeter,
}

impl<'a, P: Plugin> PluginCall<'a, P> {

	/// The ledger driving this call. Every guarded entry point on it rejects
	/// re-entry while the call is in progress.
	#[inline] pub fn ledger( &self ) -> &'a Ledger<P> { self.ledger }

	/// Address the plugin is installed at.
	#[inline] pub fn address( &self ) -> Address { self.plugin }

	/// Allowance granted to this call.
	#[inline] pub fn meter( &mut self ) -> &mut ResourceMeter { self.meter }

	/// Pays for `units` of work out of the call's allowance.
	///
	/// # Errors
	/// Fails with [`PluginFailure::OutOfResources`] once the allowance is spent.
	pub fn consume( &mut self, units: u64 ) -> Result<(), PluginFailure> {
		self.meter.consume( units ).map_err( PluginFailure::from )
	}

}

impl<P: Plugin> std::fmt::Debug for PluginCall<'_, P> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "PluginCall" )
			.field( "ledger", &self.ledger.id() )
			.field( "plugin", &self.plugin )
			.field( "meter", &self.meter )
			.finish()
	}
}
