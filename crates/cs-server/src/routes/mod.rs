pub mod clipboard;
pub mod pages;

use cs_infra::store::ClipboardStore;
use warp::{Filter, Rejection, Reply};

/// All routes of the store service.
pub fn all(
    store: ClipboardStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    clipboard::publish(store.clone())
        .or(clipboard::latest(store.clone()))
        .or(clipboard::history(store.clone()))
        .or(pages::index(store))
}

pub(crate) fn with_store(
    store: ClipboardStore,
) -> impl Filter<Extract = (ClipboardStore,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// Query-string map that also matches requests with no query string at all
/// (warp's plain `query()` rejects those).
pub(crate) fn optional_query(
) -> impl Filter<Extract = (std::collections::HashMap<String, String>,), Error = Rejection> + Clone
{
    warp::query::<std::collections::HashMap<String, String>>().or_else(|_| async {
        Ok::<(std::collections::HashMap<String, String>,), Rejection>((
            std::collections::HashMap::new(),
        ))
    })
}
