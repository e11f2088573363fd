//! Resource accounting for top-level entries and plugin calls.
//!
//! A [`ResourceMeter`] is a countdown of abstract units. Top-level mutations
//! receive the caller's meter; every plugin call runs against a fresh child
//! meter whose consumption is charged back to the caller afterwards.

use thiserror::Error ;



/// The meter ran dry. Consuming past the limit drains the meter to zero.
#[derive( Copy, Clone, Eq, PartialEq, Debug, Error )]
#[error( "Out of resources: requested {requested}, remaining {remaining}" )]
pub struct OutOfResources {
	pub requested: u64,
	pub remaining: u64,
}

#[derive( Clone, Debug, PartialEq, Eq )]
pub struct ResourceMeter {
	limit: u64,
	consumed: u64,
}

impl ResourceMeter {

	pub fn new( limit: u64 ) -> Self { Self { limit, consumed: 0 }}

	#[inline] pub fn limit( &self ) -> u64 { self.limit }

	#[inline] pub fn consumed( &self ) -> u64 { self.consumed }

	#[inline] pub fn remaining( &self ) -> u64 { self.limit - self.consumed }

	/// Consumes `units`.
	///
	/// # Errors
	/// Fails with [`OutOfResources`] if fewer than `units` remain. The meter is
	/// drained in that case, as a trapped computation would have spent it.
	pub fn consume( &mut self, units: u64 ) -> Result<(), OutOfResources> {
		let remaining = self.remaining();
		if units > remaining {
			self.consumed = self.limit ;
			return Err( OutOfResources { requested: units, remaining })
		}
		self.consumed += units ;
		Ok(())
	}

	/// Allowance a call receives when `budget` is requested: never more than
	/// 63/64 of what remains, so the caller keeps enough to finish.
	pub(crate) fn forwardable( &self, budget: u64 ) -> u64 {
		let available = self.remaining();
		budget.min( available - available / 64 )
	}

	/// Charges units spent by a child meter. The child's limit never exceeds
	/// what was forwardable, so the charge always fits.
	pub(crate) fn charge( &mut self, units: u64 ) {
		self.consumed = self.consumed.saturating_add( units ).min( self.limit );
	}

	/// True when what remains could not have covered 64/63 of `budget`, meaning
	/// a failed call may have been starved by its caller rather than failing on its own.
	pub(crate) fn starved_for( &self, budget: u64 ) -> bool {
		u128::from( self.remaining() ) * 63 / 64 < u128::from( budget )
	}

}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn consume_past_limit_drains() {
		let mut meter = ResourceMeter::new( 10 );
		assert!( meter.consume( 4 ).is_ok() );
		assert_eq!( meter.remaining(), 6 );
		assert_eq!( meter.consume( 7 ), Err( OutOfResources { requested: 7, remaining: 6 }));
		assert_eq!( meter.remaining(), 0 );
		assert_eq!( meter.consumed(), 10 );
	}

	#[test]
	fn forwards_at_most_63_64ths() {
		let meter = ResourceMeter::new( 6_400 );
		assert_eq!( meter.forwardable( 1_000 ), 1_000 );
		assert_eq!( meter.forwardable( 10_000 ), 6_300 );
		assert_eq!( ResourceMeter::new( 0 ).forwardable( 10 ), 0 );
	}

	#[test]
	fn starvation_threshold() {
		assert!( !ResourceMeter::new( 6_400 ).starved_for( 6_300 ));
		assert!( ResourceMeter::new( 6_400 ).starved_for( 6_301 ));
		assert!( !ResourceMeter::new( 0 ).starved_for( 0 ));
	}

	#[test]
	fn charge_saturates_at_limit() {
		let mut meter = ResourceMeter::new( 5 );
		meter.charge( 3 );
		meter.charge( 3 );
		assert_eq!( meter.remaining(), 0 );
	}
}
