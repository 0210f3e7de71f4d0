// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crossbeam_channel::Receiver;
use crossbeam_channel::select;

use crate::Error;
use crate::append::rolling_file::FlushReply;
use crate::append::rolling_file::rolling::State;

pub(crate) struct Worker {
    records: Receiver<Vec<u8>>,
    flushes: Receiver<FlushReply>,
    state: State,
}

impl Worker {
    pub(crate) fn new(
        records: Receiver<Vec<u8>>,
        flushes: Receiver<FlushReply>,
        state: State,
    ) -> Self {
        Self {
            records,
            flushes,
            state,
        }
    }

    /// Run until every sender is gone, or until writing fails outside a flush.
    ///
    /// A failed flush is reported to the flushing caller and the loop keeps going.
    pub(crate) fn run(self) -> Result<(), Error> {
        let Self {
            records,
            flushes,
            mut state,
        } = self;

        loop {
            select! {
                recv(records) -> record => match record {
                    Ok(record) => {
                        let batch = drain(&records, record);
                        state.write_batch(&batch)?;
                    }
                    Err(_) => return shutdown(&records, &mut state),
                },
                recv(flushes) -> reply => match reply {
                    Ok(reply) => {
                        let batch = drain(&records, vec![]);
                        let result = state.write_batch(&batch).and_then(|()| state.sync());
                        // the caller may have given up waiting
                        let _ = reply.send(result);
                    }
                    Err(_) => return shutdown(&records, &mut state),
                },
            }
        }
    }
}

/// Append every record queued right now to `batch`, without blocking.
fn drain(records: &Receiver<Vec<u8>>, mut batch: Vec<u8>) -> Vec<u8> {
    for record in records.try_iter() {
        batch.extend_from_slice(&record);
    }
    batch
}

fn shutdown(records: &Receiver<Vec<u8>>, state: &mut State) -> Result<(), Error> {
    let batch = drain(records, vec![]);
    if !batch.is_empty() {
        state.write_batch(&batch)?;
    }
    state.sync()
}
