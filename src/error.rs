use thiserror::Error ;

use crate::Address ;
use crate::guard::ReentrancyDetected ;
use crate::plugin::PluginFailure ;
use crate::unique_set::SetError ;



/// Errors returned by [`Ledger`]( crate::Ledger ) operations.
///
/// Any error returned from a mutation means none of its effects persisted:
/// balances, plugin sets, plugin state and the event log are restored.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum LedgerError {
	/// The null identifier was used where a plugin was expected.
	#[error( "Invalid plugin identifier" )] InvalidPluginIdentifier,
	/// No plugin is installed at the given address.
	#[error( "Unknown plugin: {0}" )] UnknownPlugin( Address ),
	/// A plugin is already installed at the given address.
	#[error( "Plugin address in use: {0}" )] PluginAddressInUse( Address ),
	/// The plugin serves a different ledger instance.
	#[error( "Plugin {plugin} is bound to ledger {bound}, expected {expected}" )]
	PluginBindingMismatch { plugin: Address, bound: Address, expected: Address },
	#[error( "Plugin {plugin} already registered for {account}" )]
	PluginAlreadyRegistered { account: Address, plugin: Address },
	#[error( "Plugin {plugin} not registered for {account}" )]
	PluginNotRegistered { account: Address, plugin: Address },
	#[error( "Account {account} would exceed the limit of {limit} plugins" )]
	PluginLimitExceeded { account: Address, limit: usize },
	#[error( "Index {index} out of range for {length} plugins" )]
	IndexOutOfRange { index: usize, length: usize },
	/// A guarded entry point was reached while a mutation was in flight.
	#[error( "Reentrancy detected" )] ReentrancyDetected,
	/// A plugin call failed in a way attributable to the caller running out of resources.
	#[error( "Plugin {plugin} starved of resources: {source}" )]
	PluginResourceExhausted { plugin: Address, source: PluginFailure },
	#[error( "Insufficient balance for {account}: has {balance}, needs {needed}" )]
	InsufficientBalance { account: Address, balance: u128, needed: u128 },
	#[error( "Balance overflow" )] BalanceOverflow,
	/// The zero address cannot hold or release balance.
	#[error( "Invalid account: {0}" )] InvalidAccount( Address ),
}

impl From<ReentrancyDetected> for LedgerError {
	fn from( _: ReentrancyDetected ) -> Self { Self::ReentrancyDetected }
}

impl From<SetError> for LedgerError {
	fn from( error: SetError ) -> Self { match error {
		SetError::IndexOutOfRange { index, length } => Self::IndexOutOfRange { index, length },
	}}
}
