//! Instance-wide reentrancy protection.
//!
//! Mutations take the guard exclusively for their whole duration, including the
//! plugin callbacks they drive. Reads only check that no mutation is in flight,
//! so they never serialize against each other.

use std::cell::Cell ;
use thiserror::Error ;



#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum GuardState {
	#[default] Idle,
	Locked,
}

/// Returned when a guarded entry point is reached while a mutation is in flight.
#[derive( Copy, Clone, Eq, PartialEq, Debug, Error )]
#[error( "Reentrancy detected" )]
pub struct ReentrancyDetected ;

/// Two-mode guard: exclusive for mutations, read-shared for queries.
///
/// Every rejected entry is counted, which lets the caller holding the exclusive
/// section notice a callback that tried to re-enter even if the callback chose
/// to hide the error it was given.
#[derive( Debug, Default )]
pub struct ReentrancyGuard {
	state: Cell<GuardState>,
	rejected: Cell<u64>,
}

impl ReentrancyGuard {

	pub fn new() -> Self { Self::default() }

	#[inline] pub fn state( &self ) -> GuardState { self.state.get() }

	/// Number of entries rejected over the guard's lifetime.
	#[inline] pub fn rejected_entries( &self ) -> u64 { self.rejected.get() }

	/// Locks the guard until the returned section is dropped.
	///
	/// # Errors
	/// Fails with [`ReentrancyDetected`] if the guard is already locked.
	pub fn enter_exclusive( &self ) -> Result<ExclusiveSection<'_>, ReentrancyDetected> {
		self.check_shared()?;
		self.state.set( GuardState::Locked );
		Ok( ExclusiveSection { guard: self })
	}

	/// Admits a read without changing the lock state.
	///
	/// # Errors
	/// Fails with [`ReentrancyDetected`] if a mutation is in flight.
	pub fn check_shared( &self ) -> Result<(), ReentrancyDetected> {
		match self.state.get() {
			GuardState::Idle => Ok(()),
			GuardState::Locked => {
				self.rejected.set( self.rejected.get().saturating_add( 1 ));
				tracing::warn!( "Rejected re-entry while a mutation is in flight" );
				Err( ReentrancyDetected )
			}
		}
	}

}

/// Proof of exclusive access. Unlocks the guard on drop, so every exit path releases it.
#[must_use = "the guard unlocks as soon as the section is dropped"]
#[derive( Debug )]
pub struct ExclusiveSection<'a> {
	guard: &'a ReentrancyGuard,
}

impl Drop for ExclusiveSection<'_> {
	fn drop( &mut self ) { self.guard.state.set( GuardState::Idle ); }
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn exclusive_rejects_nested_entry() {
		let guard = ReentrancyGuard::new();
		let section = guard.enter_exclusive().expect( "idle guard must admit" );
		assert_eq!( guard.state(), GuardState::Locked );
		assert_eq!( guard.enter_exclusive().map(| _ | ()), Err( ReentrancyDetected ));
		assert_eq!( guard.check_shared(), Err( ReentrancyDetected ));
		assert_eq!( guard.rejected_entries(), 2 );
		drop( section );
		assert_eq!( guard.state(), GuardState::Idle );
	}

	#[test]
	fn shared_reads_do_not_lock() {
		let guard = ReentrancyGuard::new();
		assert!( guard.check_shared().is_ok() );
		assert!( guard.check_shared().is_ok() );
		assert_eq!( guard.state(), GuardState::Idle );
		assert!( guard.enter_exclusive().is_ok() );
		assert_eq!( guard.rejected_entries(), 0 );
	}

	#[test]
	fn released_on_error_path() {
		fn failing( guard: &ReentrancyGuard ) -> Result<(), &'static str> {
			let _section = guard.enter_exclusive().map_err(| _ | "locked" )?;
			Err( "inner failure" )
		}
		let guard = ReentrancyGuard::new();
		assert_eq!( failing( &guard ), Err( "inner failure" ));
		assert_eq!( guard.state(), GuardState::Idle );
	}
}
