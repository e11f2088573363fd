//! Resource-bounded, fault-isolated calls into plugins.
//!
//! A call ends in one of three ways:
//! - **delivered**: the plugin returned `Ok`
//! - **failed**: the plugin returned an error of its own making; its state is
//! 	reverted to what it was before the call and the failure is logged by
//! 	kind and swallowed
//! - **escalated**: the call failed while the caller was too low on resources
//! 	to have granted the full budget, or the plugin tried to re-enter the
//! 	ledger; the error aborts the enclosing mutation

use tracing::{ debug, warn };

use crate::{ Address, Ledger, LedgerError, Plugin, PluginCall, PluginFailure };
use crate::resource::ResourceMeter ;



/// Units every plugin call spends on entry, before the plugin runs.
/// A call granted less than this fails without reaching the plugin.
pub const CALL_ENTRY_COST: u64 = 1 ;

#[derive( Copy, Clone, Eq, PartialEq, Debug )]
pub(crate) enum Delivery {
	Delivered,
	Failed,
}

impl<P: Plugin> Ledger<P> {

	/// Notifies `plugin` of a balance change within the configured budget.
	///
	/// The plugin is granted at most 63/64 of what the caller has left. Whatever it
	/// spends is charged to `meter`. The plugin's own failure detail is dropped
	/// unless the failure escalates.
	pub(crate) fn invoke_plugin(
		&self,
		meter: &mut ResourceMeter,
		plugin: Address,
		from: Option<Address>,
		to: Option<Address>,
		amount: u128,
	) -> Result<Delivery, LedgerError> {

		let budget = self.config().plugin_call_resource_budget();
		let mut allowance = ResourceMeter::new( meter.forwardable( budget ));
		let rejected_before = self.guard.rejected_entries();

		let result = match allowance.consume( CALL_ENTRY_COST ) {
			Err( exhausted ) => Err( PluginFailure::from( exhausted )),
			Ok(()) => {
				let mut instance = self.checkout_plugin( plugin )?;
				let before = instance.clone();
				let mut call = PluginCall { ledger: self, plugin, meter: &mut allowance };
				let result = instance.update_balances( &mut call, from, to, amount );
				// A failed call leaves no trace in the plugin
				match result.is_ok() {
					true => self.checkin_plugin( plugin, instance ),
					false => self.checkin_plugin( plugin, before ),
				}
				result
			}
		};

		meter.charge( allowance.consumed() );

		if self.guard.rejected_entries() != rejected_before {
			warn!( %plugin, "Plugin attempted to re-enter the ledger" );
			return Err( LedgerError::ReentrancyDetected )
		}

		match result {
			Ok(()) => {
				debug!( %plugin, ?from, ?to, amount, spent = allowance.consumed(), "Plugin notified" );
				Ok( Delivery::Delivered )
			},
			Err( failure ) if meter.starved_for( budget ) => {
				warn!( %plugin, remaining = meter.remaining(), budget, "Plugin call starved of resources" );
				Err( LedgerError::PluginResourceExhausted { plugin, source: failure })
			},
			Err( failure ) => {
				debug!( %plugin, kind = failure.kind(), spent = allowance.consumed(), "Plugin failure absorbed" );
				Ok( Delivery::Failed )
			},
		}

	}

}
