use serde::{ Deserialize, Serialize };

use crate::Address ;



/// Outbound notifications, recorded in the order the mutations happen.
///
/// Events of a failed mutation are rolled back with the rest of its effects.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub enum LedgerEvent {
	/// Balance moved between accounts. `None` stands for mint or burn.
	Transfer { from: Option<Address>, to: Option<Address>, amount: u128 },
	PluginAdded { account: Address, plugin: Address },
	PluginRemoved { account: Address, plugin: Address },
}

impl std::fmt::Display for LedgerEvent {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Transfer { from, to, amount } => write!(
				f, "Transfer {} -> {}: {}",
				from.map_or_else(|| "none".to_string(), | a | a.to_string() ),
				to.map_or_else(|| "none".to_string(), | a | a.to_string() ),
				amount,
			),
			Self::PluginAdded { account, plugin } => write!( f, "Plugin {} added to {}", plugin, account ),
			Self::PluginRemoved { account, plugin } => write!( f, "Plugin {} removed from {}", plugin, account ),
		}
	}
}
