use serde::{ Deserialize, Serialize };



/// A 20-byte opaque identifier.
///
/// The same type names accounts, plugins and ledger instances. [`Address::ZERO`]
/// is the null identifier and is never a valid plugin.
#[derive( Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize )]
pub struct Address( pub [u8; 20] );

impl Address {

	/// The null identifier.
	pub const ZERO: Self = Self([ 0; 20 ]);

	/// Builds an address whose low eight bytes hold `value` big-endian.
	///
	/// ```
	/// # use ledger_plugins::Address ;
	/// assert_eq!( Address::from_low_u64( 0 ), Address::ZERO );
	/// assert_eq!( Address::from_low_u64( 255 ).to_string(), "0x00000000000000000000000000000000000000ff" );
	/// ```
	pub const fn from_low_u64( value: u64 ) -> Self {
		let low = value.to_be_bytes();
		let mut bytes = [ 0; 20 ];
		let mut i = 0 ;
		while i < 8 {
			bytes[ 12 + i ] = low[ i ];
			i += 1 ;
		}
		Self( bytes )
	}

	#[inline] pub fn is_zero( &self ) -> bool { *self == Self::ZERO }

	#[inline] pub fn as_bytes( &self ) -> &[u8; 20] { &self.0 }

}

impl From<[u8; 20]> for Address {
	fn from( bytes: [u8; 20] ) -> Self { Self( bytes ) }
}

impl std::fmt::Display for Address {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "0x{}", hex::encode( self.0 ))
	}
}

impl std::fmt::Debug for Address {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "Address({})", self )
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn zero_is_default() {
		assert!( Address::default().is_zero() );
		assert!( !Address::from_low_u64( 1 ).is_zero() );
	}

	#[test]
	fn low_bytes_are_big_endian() {
		let address = Address::from_low_u64( 0x0102 );
		assert_eq!( address.as_bytes()[ 18 ], 0x01 );
		assert_eq!( address.as_bytes()[ 19 ], 0x02 );
		assert_eq!( format!( "{:?}", address ), "Address(0x0000000000000000000000000000000000000102)" );
	}

	#[test]
	fn from_raw_bytes() {
		let mut bytes = [ 0u8; 20 ];
		bytes[ 0 ] = 0xab ;
		let address = Address::from( bytes );
		assert_eq!( address.as_bytes(), &bytes );
		assert_eq!( address.to_string(), "0xab00000000000000000000000000000000000000" );
	}
}
