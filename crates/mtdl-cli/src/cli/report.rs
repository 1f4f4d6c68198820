//! Console lines for worker events.

use mtdl_core::ChunkEvent;
use std::sync::mpsc::Receiver;

/// Where a console line goes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Stream {
    Out,
    Err,
}

pub(crate) fn format_event(event: &ChunkEvent) -> (Stream, String) {
    match event {
        ChunkEvent::Started { index, start, end } => (
            Stream::Out,
            format!("Thread {}: starting download of bytes {}-{}", index, start, end),
        ),
        ChunkEvent::Finished { index, .. } => {
            (Stream::Out, format!("Thread {}: finished download", index))
        }
        ChunkEvent::Failed {
            index,
            cancelled: true,
            ..
        } => (
            Stream::Err,
            format!("Thread {}: stopped, another thread failed", index),
        ),
        ChunkEvent::Failed { index, reason, .. } => (
            Stream::Err,
            format!("Thread {}: download failed: {}", index, reason),
        ),
    }
}

/// Prints events until every sender is gone.
pub(crate) fn print_events(rx: Receiver<ChunkEvent>) {
    for event in rx {
        match format_event(&event) {
            (Stream::Out, line) => println!("{}", line),
            (Stream::Err, line) => eprintln!("{}", line),
        }
    }
}
