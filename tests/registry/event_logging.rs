use std::io::Write ;
use std::sync::{ Arc, Mutex };
use tracing_subscriber::fmt::MakeWriter ;
use crate::fixtures::{ self, Behaviour, addr };

#[derive( Clone, Default )]
struct CapturedLog( Arc<Mutex<Vec<u8>>> );

impl CapturedLog {
	fn lines_containing( &self, needle: &str ) -> usize {
		let bytes = self.0.lock().expect( "log buffer is not poisoned" ).clone();
		String::from_utf8_lossy( &bytes ).lines().filter(| line | line.contains( needle )).count()
	}
}

impl Write for CapturedLog {
	fn write( &mut self, buf: &[u8] ) -> std::io::Result<usize> {
		self.0.lock().expect( "log buffer is not poisoned" ).extend_from_slice( buf );
		Ok( buf.len() )
	}
	fn flush( &mut self ) -> std::io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for CapturedLog {
	type Writer = Self ;
	fn make_writer( &'a self ) -> Self::Writer { self.clone() }
}

#[test]
fn each_event_is_logged_once() {
	let log = CapturedLog::default();
	let subscriber = tracing_subscriber::fmt()
		.with_writer( log.clone() )
		.with_ansi( false )
		.with_max_level( tracing::Level::INFO )
		.finish();

	tracing::subscriber::with_default( subscriber, || {
		let ledger = fixtures::default_ledger();
		let plugin = fixtures::install( &ledger, 100, Behaviour::Record );
		let mut meter = fixtures::meter();
		ledger.add_plugin( &mut meter, addr( 1 ), plugin ).expect( "add succeeds" );
		ledger.remove_plugin( &mut meter, addr( 1 ), plugin ).expect( "remove succeeds" );
		ledger.mint( &mut meter, addr( 1 ), 3 ).expect( "mint succeeds" );
	});

	assert_eq!( log.lines_containing( " added to " ), 1 );
	assert_eq!( log.lines_containing( " removed from " ), 1 );
	assert_eq!( log.lines_containing( "Transfer none -> " ), 1 );
}
