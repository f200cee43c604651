//! Interactive search: each line read from stdin is treated as the
//! current contents of the search box.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use qkart_storefront::{SearchDebouncer, SearchResults};

use super::{CommandError, Context};
use crate::output;

/// Feed stdin lines through the search debouncer and print results as
/// they are published.
///
/// When input ends, waits for the last scheduled query to answer, up to
/// the debounce delay plus the HTTP timeout.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
#[instrument(skip(ctx))]
pub async fn watch(ctx: &Context) -> Result<(), CommandError> {
    let config = ctx.client.config();
    let settle = config.search_debounce + config.http_timeout;

    let mut debouncer = SearchDebouncer::new(ctx.client.clone(), config.search_debounce);
    let mut results = debouncer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_seq = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => last_seq = debouncer.on_input(text),
                None => break,
            },
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                output::search_results(&results.borrow_and_update());
            }
        }
    }

    if results.borrow().seq < last_seq {
        debug!(last_seq, "Input closed; waiting for final search");
        if tokio::time::timeout(settle, drain_until(&mut results, last_seq))
            .await
            .is_err()
        {
            warn!(last_seq, "Final search did not answer in time");
        }
    }

    Ok(())
}

/// Print published results until `seq` has been answered.
async fn drain_until(results: &mut watch::Receiver<SearchResults>, seq: u64) {
    while results.borrow().seq < seq {
        if results.changed().await.is_err() {
            return;
        }
        output::search_results(&results.borrow_and_update());
    }
}
