//! Query augmentation seam: request variables and the hooks that may adjust
//! the main query before it runs.

use std::collections::BTreeMap;

use crate::query::Query;

/// Request variables of one page request, extracted once by the transport
/// layer and handed to hooks explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVars {
    params: BTreeMap<String, String>,
    is_admin: bool,
}

impl QueryVars {
    pub fn new<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            is_admin: false,
        }
    }

    /// Mark the request as coming from the admin surface.
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The main content query these variables describe, before any hook runs.
    pub fn main_query(&self) -> Query {
        Query {
            post_type: self.get("post_type").map(str::to_string),
            search: self.get("s").map(str::to_string),
            ..Query::default()
        }
    }
}

/// Adjusts the main query before the store executes it.
pub trait QueryHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn pre_get_posts(&self, query: &mut Query, vars: &QueryVars);
}

/// Build the main query for `vars` and let every hook adjust it in order.
pub fn prepare_main_query<'a, I>(vars: &QueryVars, hooks: I) -> Query
where
    I: IntoIterator<Item = &'a dyn QueryHook>,
{
    let mut query = vars.main_query();
    for hook in hooks {
        tracing::debug!(hook = hook.name(), "running query hook");
        hook.pre_get_posts(&mut query, vars);
    }
    query
}
