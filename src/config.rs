use serde::{ Deserialize, Serialize };
use thiserror::Error ;



/// Errors raised while building a [`LedgerConfig`]. Fatal to initialisation.
#[derive( Debug, Error )]
pub enum ConfigError {
	/// `plugins_limit` must be greater than zero.
	#[error( "Plugins limit must be greater than zero" )] ZeroPluginsLimit,
	/// The configuration source could not be parsed.
	#[error( "Config Parse Error: {0}" )] Parse( #[from] toml::de::Error ),
}

/// Values fixed at ledger initialisation and immutable afterwards.
///
/// ```
/// # use ledger_plugins::LedgerConfig ;
/// let config = LedgerConfig::from_toml_str( r#"
/// 	plugins_limit = 5
/// 	plugin_call_resource_budget = 140000
/// "# ).unwrap();
/// assert_eq!( config.plugins_limit(), 5 );
/// assert_eq!( config.plugin_call_resource_budget(), 140_000 );
/// ```
#[derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize )]
#[serde( deny_unknown_fields )]
pub struct LedgerConfig {
	/// Maximum number of plugins a single account may hold
	plugins_limit: usize,
	/// Resource units granted to every plugin invocation
	#[serde( default )]
	plugin_call_resource_budget: u64,
}

impl LedgerConfig {

	pub fn new( plugins_limit: usize, plugin_call_resource_budget: u64 ) -> Self {
		Self { plugins_limit, plugin_call_resource_budget }
	}

	pub fn with_plugins_limit( mut self, plugins_limit: usize ) -> Self {
		self.plugins_limit = plugins_limit ;
		self
	}

	/// A budget of zero is valid: every plugin call then fails instantly and
	/// notifications are effectively disabled.
	pub fn with_plugin_call_resource_budget( mut self, budget: u64 ) -> Self {
		self.plugin_call_resource_budget = budget ;
		self
	}

	#[inline] pub fn plugins_limit( &self ) -> usize { self.plugins_limit }

	#[inline] pub fn plugin_call_resource_budget( &self ) -> u64 { self.plugin_call_resource_budget }

	/// # Errors
	/// Fails with [`ConfigError::ZeroPluginsLimit`] if `plugins_limit` is zero.
	pub fn validate( &self ) -> Result<(), ConfigError> {
		match self.plugins_limit {
			0 => Err( ConfigError::ZeroPluginsLimit ),
			_ => Ok(()),
		}
	}

	/// Parses and validates a TOML document.
	///
	/// # Errors
	/// Fails if the document is malformed or does not validate.
	pub fn from_toml_str( source: &str ) -> Result<Self, ConfigError> {
		let config = toml::from_str::<Self>( source )?;
		config.validate()?;
		Ok( config )
	}

}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn zero_limit_is_rejected() {
		assert!( matches!( LedgerConfig::new( 0, 1 ).validate(), Err( ConfigError::ZeroPluginsLimit )));
		assert!( matches!(
			LedgerConfig::from_toml_str( "plugins_limit = 0" ),
			Err( ConfigError::ZeroPluginsLimit ),
		));
	}

	#[test]
	fn zero_budget_is_valid() {
		let config = LedgerConfig::from_toml_str( "plugins_limit = 3" ).expect( "budget defaults to zero" );
		assert_eq!( config, LedgerConfig::new( 3, 0 ));
	}

	#[test]
	fn unknown_fields_fail_to_parse() {
		assert!( matches!(
			LedgerConfig::from_toml_str( "plugins_limit = 3\nplugins_limt = 4" ),
			Err( ConfigError::Parse( _ )),
		));
	}

	#[test]
	fn builder_overrides() {
		let config = LedgerConfig::new( 1, 1 )
			.with_plugins_limit( 10 )
			.with_plugin_call_resource_budget( 5 );
		assert_eq!( config.plugins_limit(), 10 );
		assert_eq!( config.plugin_call_resource_budget(), 5 );
	}
}
