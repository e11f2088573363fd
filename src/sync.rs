//! Diff-based propagation of a balance change to the plugins of both parties.

use itertools::Itertools ;
use pipe_trait::Pipe ;
use tracing::debug ;

use crate::{ Address, Ledger, LedgerError, Plugin };
use crate::invoker::Delivery ;
use crate::resource::ResourceMeter ;



impl<P: Plugin> Ledger<P> {

	/// Notifies every plugin held by `from` or `to` exactly once.
	///
	/// A plugin held by both parties sees the full transfer; a plugin held by
	/// one side only sees the other side as `None`. Runs after the primary
	/// balances were updated and inside the caller's exclusive section.
	pub(crate) fn sync_balances(
		&self,
		meter: &mut ResourceMeter,
		from: Option<Address>,
		to: Option<Address>,
		amount: u128,
	) -> Result<(), LedgerError> {

		if amount == 0 || from == to { return Ok(()) }

		let plugins_of = | account: Option<Address> | account
			.map(| account | self.state.borrow().registry.plugins( &account ))
			.unwrap_or_default();

		let plugins_from = plugins_of( from );
		// Entries are taken out as they are matched against the sender's plugins
		let mut plugins_to = plugins_of( to ).into_iter().map( Some ).collect::<Vec<_>>();

		let mut deliveries = Vec::with_capacity( plugins_from.len() + plugins_to.len() );

		for plugin in plugins_from {
			let shared = plugins_to.iter()
				.find_position(| candidate | **candidate == Some( plugin ))
				.map(|( index, _ )| index );
			let receiver = match shared {
				Some( index ) => { plugins_to[ index ] = None ; to },
				None => None,
			};
			self.invoke_plugin( meter, plugin, from, receiver, amount )?
				.pipe(| delivery | deliveries.push( delivery ));
		}

		for plugin in plugins_to.into_iter().flatten() {
			self.invoke_plugin( meter, plugin, None, to, amount )?
				.pipe(| delivery | deliveries.push( delivery ));
		}

		let failed = deliveries.iter().filter(| delivery | **delivery == Delivery::Failed ).count();
		debug!( ?from, ?to, amount, notified = deliveries.len(), failed, "Balances synchronised" );
		Ok(())

	}

}
