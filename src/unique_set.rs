//! Ordered, duplicate-free collection with constant-time membership.
//!
//! Removal swaps the removed element with the last one and pops, so insertion
//! order survives only until the first removal. Enumeration is deterministic
//! for any given state of the set.

use std::collections::HashMap ;
use std::hash::Hash ;
use thiserror::Error ;



#[derive( Debug, Error, Clone, Copy, PartialEq, Eq )]
pub enum SetError {
	#[error( "Index {index} out of range for set of length {length}" )]
	IndexOutOfRange { index: usize, length: usize },
}

/// An ordered set backed by a vector of items and an index map.
#[derive( Debug, Clone )]
pub struct UniqueSet<T> {
	items: Vec<T>,
	/// Position of every item inside `items`
	positions: HashMap<T, usize>,
}

impl<T> Default for UniqueSet<T> {
	fn default() -> Self {
		Self { items: Vec::new(), positions: HashMap::new() }
	}
}

impl<T: Copy + Eq + Hash> UniqueSet<T> {

	pub fn new() -> Self { Self::default() }

	#[inline] pub fn contains( &self, item: &T ) -> bool { self.positions.contains_key( item ) }

	#[inline] pub fn len( &self ) -> usize { self.items.len() }

	#[inline] pub fn is_empty( &self ) -> bool { self.items.is_empty() }

	/// Returns the item stored at `index`.
	///
	/// # Errors
	/// Fails with [`SetError::IndexOutOfRange`] if `index >= len()`.
	pub fn at( &self, index: usize ) -> Result<T, SetError> {
		self.items.get( index ).copied().ok_or( SetError::IndexOutOfRange { index, length: self.items.len() })
	}

	/// Snapshot copy of the items in their current order.
	pub fn items( &self ) -> Vec<T> { self.items.clone() }

	#[inline] pub fn iter( &self ) -> std::slice::Iter<'_, T> { self.items.iter() }

	/// Appends `item`. Returns `false` if it was already present.
	pub fn add( &mut self, item: T ) -> bool {
		if self.positions.contains_key( &item ) { return false }
		self.positions.insert( item, self.items.len() );
		self.items.push( item );
		true
	}

	/// Removes `item` by swapping it with the last element. Returns `false` if absent.
	pub fn remove( &mut self, item: &T ) -> bool {
		let Some( index ) = self.positions.remove( item ) else { return false };
		self.items.swap_remove( index );
		if let Some( moved ) = self.items.get( index ) {
			self.positions.insert( *moved, index );
		}
		true
	}

	pub fn clear( &mut self ) {
		self.items.clear();
		self.positions.clear();
	}

}

impl<'a, T> IntoIterator for &'a UniqueSet<T> {
	type Item = &'a T ;
	type IntoIter = std::slice::Iter<'a, T> ;
	fn into_iter( self ) -> Self::IntoIter { self.items.iter() }
}

#[cfg( test )]
mod tests {
	use super::* ;
	use proptest::prelude::* ;

	#[test]
	fn add_rejects_duplicates() {
		let mut set = UniqueSet::new();
		assert!( set.add( 1u32 ));
		assert!( set.add( 2 ));
		assert!( !set.add( 1 ));
		assert_eq!( set.items(), vec![ 1, 2 ]);
	}

	#[test]
	fn remove_swaps_last_into_hole() {
		let mut set = UniqueSet::new();
		( 1u32..=4 ).for_each(| i | { set.add( i ); });
		assert!( set.remove( &2 ));
		assert_eq!( set.items(), vec![ 1, 4, 3 ]);
		assert_eq!( set.at( 1 ), Ok( 4 ));
		assert!( !set.remove( &2 ));
		assert!( set.remove( &3 ));
		assert_eq!( set.items(), vec![ 1, 4 ]);
	}

	#[test]
	fn at_out_of_range() {
		let mut set = UniqueSet::new();
		set.add( 7u32 );
		assert_eq!( set.at( 1 ), Err( SetError::IndexOutOfRange { index: 1, length: 1 }));
	}

	#[test]
	fn iterates_by_reference() {
		let mut set = UniqueSet::new();
		( 1u32..=3 ).for_each(| i | { set.add( i ); });
		let mut total = 0 ;
		for item in &set { total += item ; }
		assert_eq!( total, 6 );
		assert_eq!( set.iter().copied().collect::<Vec<_>>(), set.items() );
	}

	#[test]
	fn clear_empties() {
		let mut set = UniqueSet::new();
		set.add( 1u32 );
		set.clear();
		assert!( set.is_empty() );
		assert!( !set.contains( &1 ));
		assert!( set.add( 1 ));
	}

	proptest! {
		#[test]
		fn index_map_tracks_items( ops in proptest::collection::vec(( any::<bool>(), 0u8..16 ), 0..64 )) {
			let mut set = UniqueSet::new();
			let mut model = std::collections::BTreeSet::new();
			for ( insert, value ) in ops {
				match insert {
					true => prop_assert_eq!( set.add( value ), model.insert( value )),
					false => prop_assert_eq!( set.remove( &value ), model.remove( &value )),
				}
			}
			prop_assert_eq!( set.len(), model.len() );
			for ( index, item ) in set.iter().enumerate() {
				prop_assert_eq!( set.positions.get( item ).copied(), Some( index ));
				prop_assert!( model.contains( item ));
			}
		}
	}
}
