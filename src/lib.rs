//! Balance-change propagation from a ledger to opted-in plugins.
//!
//! Accounts opt into **plugins**: external observers that want to mirror the
//! balances of the accounts that chose them. Every balance change is then
//! forwarded to the plugins of both parties. `ledger_plugins` guarantees that
//! forwarding stays bounded and cannot be turned against the ledger:
//!
//! - every plugin call runs under a fixed resource budget
//! - a plugin that fails on its own cannot block a balance change
//! - a call starved by its caller aborts the whole mutation instead of being
//! 	mistaken for an ordinary plugin failure
//! - plugin callbacks cannot re-enter the ledger
//! - no account ever holds more than the configured number of plugins
//!
//! # Core Concepts
//!
//! - [`Ledger`]: Holds balances, the per-account plugin sets and the installed
//! 	plugins. All entry points take `&self`; mutations take [`&mut ResourceMeter`](ResourceMeter)
//! 	to pay for the plugin calls they make.
//!
//! - [`Plugin`]: The observer contract. A plugin declares the ledger it is bound to and
//! 	receives `( from, to, amount )` for every change touching an account that holds it.
//! 	Either side is `None` when that account does not hold the plugin.
//!
//! - [`LedgerConfig`]: The per-account plugin limit and the per-call resource budget,
//! 	both fixed at initialisation.
//!
//! - [`ReentrancyGuard`]: Locked exclusively by every mutation, checked by every read.
//!
//! # Notification rules
//!
//! For a change of `amount` from `X` to `Y`:
//!
//! | Plugin held by | Plugin receives |
//! |----------------|-----------------|
//! | `X` and `Y`    | `( Some( X ), Some( Y ), amount )` |
//! | `X` only       | `( Some( X ), None, amount )` |
//! | `Y` only       | `( None, Some( Y ), amount )` |
//!
//! Adding a plugin to an account with a balance notifies it of `( None, Some( account ), balance )`;
//! removing it notifies `( Some( account ), None, balance )`.
//!
//! # Example
//!
//! ```
//! use ledger_plugins::{
//! 	Address, Ledger, LedgerConfig, LedgerEvent, Plugin, PluginCall, PluginFailure, ResourceMeter,
//! };
//! use std::collections::HashMap ;
//!
//! // A plugin mirroring the balances of its opted-in accounts.
//! #[derive( Clone, Default )]
//! struct Mirror { ledger: Address, balances: HashMap<Address, u128> }
//!
//! impl Plugin for Mirror {
//! 	fn bound_ledger( &self ) -> Address { self.ledger }
//! 	fn update_balances(
//! 		&mut self,
//! 		call: &mut PluginCall<'_, Self>,
//! 		from: Option<Address>,
//! 		to: Option<Address>,
//! 		amount: u128,
//! 	) -> Result<(), PluginFailure> {
//! 		call.consume( 5_000 )?;
//! 		if let Some( from ) = from { *self.balances.entry( from ).or_default() -= amount ; }
//! 		if let Some( to ) = to { *self.balances.entry( to ).or_default() += amount ; }
//! 		Ok(())
//! 	}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger_id = Address::from_low_u64( 1 );
//! let ledger = Ledger::new( ledger_id, LedgerConfig::new( 4, 50_000 ))?;
//!
//! let mirror = Address::from_low_u64( 100 );
//! ledger.install_plugin( mirror, Mirror { ledger: ledger_id, ..Mirror::default() })?;
//!
//! let ( alice, bob ) = ( Address::from_low_u64( 10 ), Address::from_low_u64( 11 ));
//! let mut meter = ResourceMeter::new( 1_000_000 );
//! ledger.mint( &mut meter, alice, 100 )?;
//! ledger.add_plugin( &mut meter, alice, mirror )?;
//! ledger.add_plugin( &mut meter, bob, mirror )?;
//! ledger.transfer( &mut meter, alice, bob, 40 )?;
//!
//! let state = ledger.plugin( mirror )?;
//! assert_eq!( state.balances[ &alice ], 60 );
//! assert_eq!( state.balances[ &bob ], 40 );
//! assert_eq!( ledger.plugin_balance_of( mirror, bob )?, ledger.balance_of( bob )? );
//! assert!( ledger.events()?.contains( &LedgerEvent::PluginAdded { account: bob, plugin: mirror }));
//! # Ok(())
//! # }
//! ```
//!
//! # Resource Budget
//!
//! A plugin call receives `min( budget, remaining - remaining / 64 )` units from the
//! caller's meter and must pay for its work with [`PluginCall::consume`]. Every call
//! spends [`CALL_ENTRY_COST`] first, so a budget of zero disables notifications:
//! every call fails instantly and is absorbed.
//!
//! When a call fails, the ledger checks what the caller has left. If `remaining * 63 / 64`
//! is below the budget, the plugin may have failed only because the caller could not
//! grant it the full budget, so the failure escalates as
//! [`LedgerError::PluginResourceExhausted`] and the whole mutation is undone.
//!
//! # Atomicity
//!
//! Every mutation is journalled. If it returns an error, balances, plugin sets,
//! the state of every plugin it called and the event log are restored to what they
//! were before the call.

mod address ;
mod config ;
mod error ;
mod event ;
mod guard ;
mod invoker ;
mod journal ;
mod ledger ;
mod plugin ;
mod registry ;
mod resource ;
mod sync ;
mod unique_set ;

pub use address::Address ;
pub use config::{ ConfigError, LedgerConfig };
pub use error::LedgerError ;
pub use event::LedgerEvent ;
pub use guard::{ ExclusiveSection, GuardState, ReentrancyDetected, ReentrancyGuard };
pub use invoker::CALL_ENTRY_COST ;
pub use ledger::{ Ledger, STATE_VERSION };
pub use plugin::{ Plugin, PluginCall, PluginFailure };
pub use resource::{ OutOfResources, ResourceMeter };
pub use unique_set::{ SetError, UniqueSet };
