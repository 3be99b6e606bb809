//! Navigation state.
//!
//! The shell tracks three collections: the working collection, the previous
//! one (for `cd -`) and the initial one (for bare `cd`). The triple is an
//! explicit value threaded through every operation, never ambient state, so
//! the core runs against any client without a live connection.

use crate::client::{ClientError, NamespaceClient};
use crate::core::classify::collection_at;
use crate::models::Collection;

/// The shell's position in the remote namespace.
///
/// Invariant: all three collections existed at their last successful
/// resolution. A failed `cd` leaves the whole triple untouched.
#[derive(Clone, Debug)]
pub struct NavigationState {
    working: Collection,
    previous: Collection,
    initial: Collection,
}

impl NavigationState {
    /// Start at `initial`; previous starts equal to working.
    pub fn new(initial: Collection) -> Self {
        Self {
            working: initial.clone(),
            previous: initial.clone(),
            initial,
        }
    }

    pub fn working(&self) -> &Collection {
        &self.working
    }

    pub fn previous(&self) -> &Collection {
        &self.previous
    }

    pub fn initial(&self) -> &Collection {
        &self.initial
    }

    /// Change the working collection.
    ///
    /// `None` returns to the initial collection and `Some("-")` swaps with
    /// the previous one; neither touches the remote service. Any other
    /// target is resolved against the working collection and fetched. On
    /// error the state is provably unchanged: the fields are only written
    /// after the fetch succeeded.
    pub fn change_directory(
        &mut self,
        client: &dyn NamespaceClient,
        target: Option<&str>,
    ) -> Result<(), ClientError> {
        let next = match target {
            None => self.initial.clone(),
            Some("-") => self.previous.clone(),
            Some(path) => collection_at(client, &self.working, path)?,
        };
        self.previous = std::mem::replace(&mut self.working, next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;
    use crate::models::Manifest;

    fn client() -> MemoryClient {
        let client = MemoryClient::new("tZone", "alice");
        client
            .seed(&Manifest {
                collections: vec![
                    "/tZone/home/alice/a".to_string(),
                    "/tZone/home/alice/b".to_string(),
                ],
                objects: vec![],
            })
            .expect("seed");
        client
    }

    fn state(client: &MemoryClient) -> NavigationState {
        NavigationState::new(client.get_collection("/tZone/home/alice").expect("home"))
    }

    #[test]
    fn test_new_state_is_all_initial() {
        let client = client();
        let nav = state(&client);
        assert_eq!(nav.working().path, "/tZone/home/alice");
        assert_eq!(nav.previous().path, "/tZone/home/alice");
        assert_eq!(nav.initial().path, "/tZone/home/alice");
    }

    #[test]
    fn test_cd_into_collection() {
        let client = client();
        let mut nav = state(&client);
        nav.change_directory(&client, Some("a")).expect("cd a");
        assert_eq!(nav.working().path, "/tZone/home/alice/a");
        assert_eq!(nav.previous().path, "/tZone/home/alice");
        assert_eq!(nav.initial().path, "/tZone/home/alice");
    }

    #[test]
    fn test_cd_failure_is_a_no_op() {
        let client = client();
        let mut nav = state(&client);
        nav.change_directory(&client, Some("a")).expect("cd a");

        let err = nav
            .change_directory(&client, Some("missing"))
            .expect_err("cd missing");
        assert!(matches!(err, ClientError::CollectionNotFound(_)));
        // Every field untouched, including previous.
        assert_eq!(nav.working().path, "/tZone/home/alice/a");
        assert_eq!(nav.previous().path, "/tZone/home/alice");
        assert_eq!(nav.initial().path, "/tZone/home/alice");
    }

    #[test]
    fn test_cd_dash_two_step_history() {
        let client = client();
        let mut nav = state(&client);
        nav.change_directory(&client, Some("b")).expect("cd b");

        nav.change_directory(&client, Some("-")).expect("cd -");
        assert_eq!(nav.working().path, "/tZone/home/alice");
        assert_eq!(nav.previous().path, "/tZone/home/alice/b");

        nav.change_directory(&client, Some("-")).expect("cd -");
        assert_eq!(nav.working().path, "/tZone/home/alice/b");
        assert_eq!(nav.previous().path, "/tZone/home/alice");
    }

    #[test]
    fn test_bare_cd_returns_to_initial() {
        let client = client();
        let mut nav = state(&client);
        nav.change_directory(&client, Some("a")).expect("cd a");
        nav.change_directory(&client, None).expect("bare cd");
        assert_eq!(nav.working().path, "/tZone/home/alice");
        assert_eq!(nav.previous().path, "/tZone/home/alice/a");
    }

    #[test]
    fn test_cd_resolves_parent_walks() {
        let client = client();
        let mut nav = state(&client);
        nav.change_directory(&client, Some("a")).expect("cd a");
        nav.change_directory(&client, Some("../b")).expect("cd ../b");
        assert_eq!(nav.working().path, "/tZone/home/alice/b");
    }
}
