//! Redirect resolution: follow `Location` hops to the terminal URL.
//!
//! Best effort by contract. Whatever happens on the wire, the caller gets
//! a usable URL back: the terminal one when the chain completes, the last
//! known one when transport fails mid-chain.

use url::Url;

use crate::probe::RedirectProbe;

/// Hop budget used when the config does not override it.
pub const DEFAULT_MAX_HOPS: usize = 5;

/// How a resolution run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A non-redirect response (or a redirect without `Location`) was
    /// reached.
    Final,
    /// The hop budget ran out while the server was still redirecting.
    HopLimit,
    /// Transport failed mid-chain; the URL is the last one known good.
    Degraded,
}

/// Terminal URL of a resolution run, usable regardless of outcome.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub url: String,
    pub outcome: ResolutionOutcome,
}

/// Follows up to `max_hops` redirects from `url` using one header-only
/// probe per hop. Relative `Location` values are resolved against the
/// current URL. Never fails: transport errors degrade to the current URL.
pub fn resolve(url: &str, max_hops: usize, probe: &dyn RedirectProbe) -> Resolution {
    let mut current = url.to_string();
    let mut hops = 0;

    while hops < max_hops {
        let response = match probe.probe(&current) {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("probe of {current} failed: {err}");
                return Resolution {
                    url: current,
                    outcome: ResolutionOutcome::Degraded,
                };
            }
        };

        let Some(target) = response.redirect_target() else {
            return Resolution {
                url: current,
                outcome: ResolutionOutcome::Final,
            };
        };

        // Location may be relative; resolve it against the current URL.
        match Url::parse(&current).and_then(|base| base.join(target)) {
            Ok(next) => current = next.to_string(),
            Err(err) => {
                tracing::debug!("unusable Location {target:?} from {current}: {err}");
                return Resolution {
                    url: current,
                    outcome: ResolutionOutcome::Degraded,
                };
            }
        }
        hops += 1;
    }

    Resolution {
        url: current,
        outcome: ResolutionOutcome::HopLimit,
    }
}
