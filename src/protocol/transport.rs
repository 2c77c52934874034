//! Opening the two channel ends at startup.
//!
//! In pipe mode the request path is opened (created if needed) for writing,
//! then the plotter waits for the route service to create the response path.
//! Console mode maps both directions onto stdin/stdout for manual testing.

use crate::{
    core::config::ChannelConfig,
    protocol::channel::{NoticeRoute, StreamChannel},
    Result,
};
use std::{
    fs::{File, OpenOptions},
    io::{BufReader, Stdout, StdinLock},
    path::Path,
    thread,
};

pub type PipeChannel = StreamChannel<BufReader<File>, File>;

pub type ConsoleChannel = StreamChannel<StdinLock<'static>, Stdout>;

/// Opens the request pipe for writing and blocks until the response pipe
/// exists, logging once per poll interval.
pub fn open_pipes(config: &ChannelConfig) -> Result<PipeChannel> {
    let writer = OpenOptions::new()
        .write(true)
        .create(true)
        .open(&config.request_path)?;
    log::info!("request channel {} opened", config.request_path.display());

    wait_for(&config.response_path, config)?;
    let reader = BufReader::new(File::open(&config.response_path)?);
    log::info!("response channel {} opened", config.response_path.display());

    Ok(StreamChannel::new(reader, writer, NoticeRoute::Log))
}

/// Both directions on the terminal. Notices are echoed to stdout.
pub fn open_console() -> ConsoleChannel {
    log::info!("using stdin/stdout as the route channel");
    StreamChannel::new(
        std::io::stdin().lock(),
        std::io::stdout(),
        NoticeRoute::Writer,
    )
}

fn wait_for(path: &Path, config: &ChannelConfig) -> Result<()> {
    while !path.try_exists()? {
        log::info!("Waiting for the creation of {}", path.display());
        thread::sleep(config.poll_interval());
    }
    Ok(())
}
