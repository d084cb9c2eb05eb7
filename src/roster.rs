use crate::store::SnapshotStore;
use crate::{reconcile, renumber, Client, Draft, Error, User};

use futures::prelude::*;
use validator::Validate as _;

/// Yes/no gate the delete flow asks before it touches anything
///
/// The presentation layer decides how to ask; tests just answer.
pub trait Confirm {
    fn confirm(&mut self, user: &User) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&User) -> bool,
{
    fn confirm(&mut self, user: &User) -> bool {
        (self)(user)
    }
}

/// The working list plus the two collaborators it is derived from
///
/// Owned by exactly one command invocation at a time, so there's nothing to
/// lock. Every mutation awaits its remote call before the list or the
/// snapshot change; a rejected call leaves both exactly as they were.
pub struct Roster<S> {
    client: Client,
    store: S,
    users: Vec<User>,
}

impl<S> Roster<S>
where
    S: SnapshotStore,
{
    /// Fetch the remote collection and merge the stored snapshot over it
    pub async fn load(client: Client, store: S) -> Result<Self, Error> {
        let remote = client
            .get_users()
            .inspect_err(|err| log::error!("cannot fetch the user collection: {}", err))
            .await?;
        let stored = store.get().unwrap_or_default();

        log::debug!(
            "reconciling {} remote with {} stored users",
            remote.len(),
            stored.len()
        );
        let users = reconcile(remote, stored);

        Ok(Self {
            client,
            store,
            users,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Case-insensitive name filter, the way the list view searches
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a User> + 'a {
        let term = term.to_lowercase();
        self.users
            .iter()
            .filter(move |user| user.name.to_lowercase().contains(&term))
    }

    /// Look up a single user, preferring the working list
    ///
    /// A miss falls back to one fetch by id, so a direct `show` works before
    /// anything was listed. NotFound and Fetch stay distinct.
    pub async fn user(&self, id: u64) -> Result<User, Error> {
        if let Some(user) = self.users.iter().find(|user| user.id == id) {
            return Ok(user.clone());
        }
        log::debug!("{} isn't on the working list, asking the remote", id);
        self.client.get_user(id).await
    }

    /// Append a new user with the next free id
    pub async fn create(&mut self, draft: Draft) -> Result<User, Error> {
        draft.validate().map_err(Error::Invalid)?;

        let id = self.users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = draft.into_user(id);

        self.client.create_user(&user).await?;

        let mut next = self.users.clone();
        next.push(user.clone());
        self.commit(next)?;

        log::info!("created {}", user);
        Ok(user)
    }

    /// Replace the record with this id, in place, order unchanged
    pub async fn update(&mut self, id: u64, draft: Draft) -> Result<User, Error> {
        draft.validate().map_err(Error::Invalid)?;

        let index = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(Error::NotFound { id })?;
        let user = draft.into_user(id);

        self.client.update_user(&user).await?;

        let mut next = self.users.clone();
        next[index] = user.clone();
        self.commit(next)?;

        log::info!("updated {}", user);
        Ok(user)
    }

    /// Remove a user, then renumber the survivors to keep the ids dense
    ///
    /// The gate is asked first; a declined delete is a no-op, not an error.
    pub async fn delete(&mut self, id: u64, mut gate: impl Confirm) -> Result<Option<User>, Error> {
        let index = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(Error::NotFound { id })?;

        if !gate.confirm(&self.users[index]) {
            log::debug!("delete of {} declined", id);
            return Ok(None);
        }

        self.client.delete_user(id).await?;

        let mut next = self.users.clone();
        let removed = next.remove(index);
        renumber(&mut next);
        self.commit(next)?;

        log::info!("removed {}, survivors renumbered", removed);
        Ok(Some(removed))
    }

    // The snapshot is replaced before the list is, so the two can't drift
    fn commit(&mut self, next: Vec<User>) -> Result<(), Error> {
        self.store.set(&next).map_err(Error::Store)?;
        self.users = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use crate::user::sample;
    use crate::{database, Draft};

    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn store() -> KeyValueStore<'static> {
        KeyValueStore::in_memory(database::rand_db_name()).unwrap()
    }

    fn expect_list(server: &Server, users: &[User]) {
        server.expect(
            Expectation::matching(all_of![request::method("GET"), request::path("/users")])
                .respond_with(json_encoded(users.to_vec())),
        );
    }

    async fn load(server: &Server, store: KeyValueStore<'static>) -> Roster<KeyValueStore<'static>> {
        let client = Client::new(format!("http://{}", server.addr()));
        Roster::load(client, store).await.unwrap()
    }

    fn draft(name: &str) -> Draft {
        let mut draft = Draft::new();
        draft.name = name.to_string();
        draft.email = format!("{}@example.com", name);
        draft.phone = "0123456789".into();
        draft.set_street("1 Somewhere");
        draft.set_city("Anywhere");
        draft
    }

    fn ids(users: &[User]) -> Vec<u64> {
        users.iter().map(|user| user.id).collect()
    }

    #[tokio::test]
    async fn load_merges_the_snapshot_over_the_remote() {
        let server = Server::run();
        let store = store();
        SnapshotStore::set(&store, &[sample(2, "stale"), sample(5, "local")]).unwrap();

        expect_list(&server, &[sample(1, "a"), sample(2, "b")]);
        let roster = load(&server, store).await;

        assert_eq!(ids(roster.users()), [1, 2, 5]);
        // the remote copy of id 2 wins over the stored one
        assert_eq!(roster.users()[1].name, "b");
    }

    #[tokio::test]
    async fn create_assigns_the_next_free_id() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b"), sample(3, "c")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("POST"), request::path("/users")])
                .respond_with(status_code(201)),
        );

        let user = roster.create(draft("dot")).await.unwrap();
        assert_eq!(user.id, 4);
        assert_eq!(ids(roster.users()), [1, 2, 3, 4]);
        assert_eq!(SnapshotStore::get(&roster.store), Some(roster.users.clone()));
    }

    #[tokio::test]
    async fn create_on_an_empty_list_starts_at_one() {
        let server = Server::run();
        expect_list(&server, &[]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("POST"), request::path("/users")])
                .respond_with(status_code(201)),
        );

        let user = roster.create(draft("solo")).await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn a_rejected_create_changes_nothing() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("POST"), request::path("/users")])
                .respond_with(status_code(500)),
        );

        let err = roster.create(draft("dot")).await.unwrap_err();
        assert!(matches!(err, Error::Write(..)));
        assert_eq!(ids(roster.users()), [1]);
        assert_eq!(SnapshotStore::get(&roster.store), None);
    }

    #[tokio::test]
    async fn an_invalid_draft_never_reaches_the_remote() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a")]);
        let mut roster = load(&server, store()).await;

        // no POST expectation; an attempt would fail the test
        let mut bad = draft("dot");
        bad.phone = "not-a-phone".into();
        let err = roster.create(bad).await.unwrap_err();
        assert!(matches!(err, Error::Invalid(..)));
    }

    #[tokio::test]
    async fn update_replaces_positionally() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b"), sample(3, "c")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("PUT"), request::path("/users/2")])
                .respond_with(status_code(200)),
        );

        let user = roster.update(2, draft("brand new")).await.unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(ids(roster.users()), [1, 2, 3]);
        assert_eq!(roster.users()[1].name, "brand new");
        assert_eq!(SnapshotStore::get(&roster.store), Some(roster.users.clone()));
    }

    #[tokio::test]
    async fn update_of_an_unknown_id_stays_local() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a")]);
        let mut roster = load(&server, store()).await;

        let err = roster.update(9, draft("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 9 }));
    }

    #[tokio::test]
    async fn a_rejected_update_changes_nothing() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("PUT"), request::path("/users/2")])
                .respond_with(status_code(500)),
        );

        let err = roster.update(2, draft("brand new")).await.unwrap_err();
        assert!(matches!(err, Error::Write(..)));
        assert_eq!(roster.users()[1].name, "b");
        assert_eq!(SnapshotStore::get(&roster.store), None);
    }

    #[tokio::test]
    async fn delete_renumbers_the_survivors() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b"), sample(3, "c")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("DELETE"), request::path("/users/2")])
                .respond_with(status_code(200)),
        );

        let removed = roster.delete(2, |_: &User| true).await.unwrap().unwrap();
        assert_eq!(removed.name, "b");

        // old id 3 now answers to id 2
        assert_eq!(ids(roster.users()), [1, 2]);
        assert_eq!(roster.users()[1].name, "c");
        assert_eq!(SnapshotStore::get(&roster.store), Some(roster.users.clone()));
    }

    #[tokio::test]
    async fn a_declined_delete_is_a_no_op() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b")]);
        let mut roster = load(&server, store()).await;

        // no DELETE expectation; the gate says no before any call
        let kept = roster.delete(2, |_: &User| false).await.unwrap();
        assert!(kept.is_none());
        assert_eq!(ids(roster.users()), [1, 2]);
    }

    #[tokio::test]
    async fn a_rejected_delete_changes_nothing() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(2, "b")]);
        let mut roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("DELETE"), request::path("/users/2")])
                .respond_with(status_code(500)),
        );

        let err = roster.delete(2, |_: &User| true).await.unwrap_err();
        assert!(matches!(err, Error::Write(..)));
        assert_eq!(ids(roster.users()), [1, 2]);
    }

    #[tokio::test]
    async fn detail_prefers_the_working_list() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a"), sample(5, "e")]);
        let roster = load(&server, store()).await;

        // no GET /users/5 expectation; a fetch would fail the test
        let user = roster.user(5).await.unwrap();
        assert_eq!(user.name, "e");
    }

    #[tokio::test]
    async fn detail_falls_back_to_one_fetch() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "a")]);
        let roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("GET"), request::path("/users/9")])
                .respond_with(json_encoded(sample(9, "i"))),
        );

        let user = roster.user(9).await.unwrap();
        assert_eq!(user.name, "i");
    }

    #[tokio::test]
    async fn detail_tells_absence_from_failure() {
        let server = Server::run();
        expect_list(&server, &[]);
        let roster = load(&server, store()).await;

        server.expect(
            Expectation::matching(all_of![request::method("GET"), request::path("/users/9")])
                .respond_with(status_code(404)),
        );
        let err = roster.user(9).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 9 }));

        server.expect(
            Expectation::matching(all_of![request::method("GET"), request::path("/users/10")])
                .respond_with(status_code(500)),
        );
        let err = roster.user(10).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(..)));
    }

    #[tokio::test]
    async fn search_filters_by_name() {
        let server = Server::run();
        expect_list(&server, &[sample(1, "Ada"), sample(2, "Grace"), sample(3, "adamant")]);
        let roster = load(&server, store()).await;

        let hits = roster.search("ada").map(|user| user.id).collect::<Vec<_>>();
        assert_eq!(hits, [1, 3]);
    }
}
