use crate::{Error, User};

// A clonable client for the remote user collection
//
// The demo API answers 2xx for writes without actually persisting anything;
// a 2xx is treated as success regardless.
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    base: String,
}

impl Client {
    pub const DEFAULT_ADDRESS: &'static str = "https://jsonplaceholder.typicode.com";

    /// Create a new client for the collection at `address`
    pub fn new(address: impl ToString) -> Self {
        let client = reqwest::ClientBuilder::new()
            .user_agent(env!("ROSTER_USER_AGENT"))
            .build()
            .unwrap();
        Self {
            client,
            base: address.to_string(),
        }
    }

    /// Fetch the whole user collection
    pub async fn get_users(&self) -> Result<Vec<User>, Error> {
        self.client
            .get(&format!("{}/users", self.base))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(Error::fetch)?
            .json()
            .await
            .map_err(Error::fetch)
    }

    /// Fetch a single user by id
    ///
    /// A 404 means the collection doesn't know the id; everything else that
    /// goes wrong is a fetch failure.
    pub async fn get_user(&self, id: u64) -> Result<User, Error> {
        let resp = self
            .client
            .get(&format!("{}/users/{}", self.base, id))
            .send()
            .await
            .map_err(Error::fetch)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { id });
        }

        resp.error_for_status()
            .map_err(Error::fetch)?
            .json()
            .await
            .map_err(Error::fetch)
    }

    /// Ask the collection to add this user, id included
    pub async fn create_user(&self, user: &User) -> Result<(), Error> {
        self.client
            .post(&format!("{}/users", self.base))
            .json(user)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(Error::write)
    }

    /// Ask the collection to replace the record with this user's id
    pub async fn update_user(&self, user: &User) -> Result<(), Error> {
        self.client
            .put(&format!("{}/users/{}", self.base, user.id))
            .json(user)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(Error::write)
    }

    /// Ask the collection to remove the record with this id
    pub async fn delete_user(&self, id: u64) -> Result<(), Error> {
        self.client
            .delete(&format!("{}/users/{}", self.base, id))
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(Error::write)
    }
}
