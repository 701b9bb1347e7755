// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::thread;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::BoxFuture;

use crate::{Fetch, FetchError};

/// Fetches over HTTP(S) with `ureq`.
///
/// `ureq` is blocking, so every request runs on its own short-lived thread and
/// the returned future only waits for that thread's answer. Any status
/// outside `2xx` is a failure.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(ureq::Agent::new_with_defaults())
    }
}

impl HttpFetcher {
    /// Fetch through `agent`, which carries timeouts and proxy settings.
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

fn get(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, FetchError> {
    let request_failed = |err: ureq::Error| match err {
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_owned(),
            status,
        },
        other => FetchError::Request {
            url: url.to_owned(),
            message: other.to_string(),
        },
    };
    let mut response = agent.get(url).call().map_err(request_failed)?;
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(FetchError::Status {
            url: url.to_owned(),
            status,
        });
    }
    response.body_mut().read_to_vec().map_err(request_failed)
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        let agent = self.agent.clone();
        let owned_url = url.to_owned();
        let spawned = thread::Builder::new()
            .name("canopy-http-fetch".into())
            .spawn(move || {
                let result = get(&agent, &owned_url);
                // The receiver is gone if the load was dropped; nothing to report.
                let _ = tx.send(result);
            });

        let url = url.to_owned();
        match spawned {
            Ok(_) => rx
                .map(move |answer| answer.unwrap_or_else(|_| Err(FetchError::Abandoned { url })))
                .boxed(),
            Err(err) => {
                let err = FetchError::Request {
                    url,
                    message: err.to_string(),
                };
                async move { Err(err) }.boxed()
            }
        }
    }
}
