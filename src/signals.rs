use log::debug;
use simple_signal::{self, Signal};
use tokio_util::sync::CancellationToken;

/// Token cancelled by the first Ctrl+C (SIGINT) or SIGTERM. The monitor
/// treats either one as the user stopping it.
pub fn setup_signals() -> CancellationToken {
    let interrupted = CancellationToken::new();
    let handler_token = interrupted.clone();

    simple_signal::set_handler(&[Signal::Int, Signal::Term], move |signals| {
        debug!("Received {:?}", signals);
        handler_token.cancel();
    });

    interrupted
}
