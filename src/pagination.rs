use std::collections::HashSet;
use std::future::Future;

use log::debug;

use crate::error::{Error, Result};
use crate::models::Page;

/// Follow continuation tokens until a page carries none, concatenating every page.
///
/// `fetch_page` receives `None` for the first request and the previous page's token
/// afterwards. Any failing page fails the whole listing with [`Error::Listing`];
/// pages already collected are dropped.
pub async fn collect_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(token.take()).await.map_err(Error::into_listing)?;
        pages += 1;
        items.extend(page.items);

        match page.next_page_token {
            Some(next) if !next.is_empty() => {
                if !seen_tokens.insert(next.clone()) {
                    return Err(Error::Listing(format!(
                        "Listing returned page token {:?} twice",
                        next
                    )));
                }
                token = Some(next);
            }
            _ => break,
        }
    }

    debug!("Collected {} item(s) over {} page(s)", items.len(), pages);
    Ok(items)
}
