//! Newline-delimited JSON decoding (Bytes -> JSON Value)
//!
//! Ollama streams chat responses as one JSON object per line. Network chunks do not
//! respect line boundaries, so partial lines are buffered until the newline arrives.

use crate::{BoxStream, Error};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde_json::Value;

pub fn decode_ndjson(input: BoxStream<'static, Bytes>) -> BoxStream<'static, Value> {
    // Buffer raw bytes so multi-byte characters split across chunks stay intact.
    let stream = stream::unfold(
        (input, Vec::<u8>::new(), false),
        move |(mut input, mut buf, finished)| async move {
            if finished {
                return None;
            }
            loop {
                if let Some(idx) = buf.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buf.drain(..=idx).collect();
                    let line = String::from_utf8_lossy(&line);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let item = serde_json::from_str::<Value>(line).map_err(Error::Serialization);
                    return Some((item, (input, buf, false)));
                }

                match input.next().await {
                    Some(Ok(bytes)) => {
                        buf.extend_from_slice(&bytes);
                        continue;
                    }
                    Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                    None => {
                        let rest = String::from_utf8_lossy(&buf);
                        let line = rest.trim();
                        if line.is_empty() {
                            return None;
                        }
                        let item = serde_json::from_str::<Value>(line).map_err(Error::Serialization);
                        return Some((item, (input, Vec::new(), true)));
                    }
                }
            }
        },
    );

    Box::pin(stream)
}
