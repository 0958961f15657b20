use async_graphql::*;
use userhub_core::User;

#[derive(SimpleObject, Clone)]
#[graphql(name = "User")]
pub struct GqlUser {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl From<User> for GqlUser {
    fn from(u: User) -> Self {
        Self {
            id: ID(u.id),
            name: u.name,
            email: u.email,
        }
    }
}
