// Teams and their membership.

use pagerly_api::{ApiClient, Error, Method, Reference, RequestOptions};

use crate::descriptor::ResourceDescriptor;
use crate::entity::Entity;
use crate::resource::Resource;

const DISPLAY: &[&str] = &["id", "name"];

pub static TEAMS: ResourceDescriptor = ResourceDescriptor::new("teams").display_fields(DISPLAY);

pub fn teams(client: &ApiClient) -> Resource {
    Resource::new(client, &TEAMS)
}

/// Add a user to the team: PUT `teams/{id}/users/{user_id}`.
pub fn add_user(team: &Entity, user: impl Into<Reference>) -> Result<(), Error> {
    team.ensure_kind(&TEAMS)?;
    team.ensure_live()?;
    let user = user.into();
    let suffix = format!("users/{}", user.id()?);
    team.request(Method::PUT, Some(&suffix), &RequestOptions::new())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::users::USERS;
    use crate::test_support::{Scripted, client};

    #[test]
    fn add_user_accepts_entity_or_id() {
        let scripted = Scripted::new();
        scripted.push(204, "");
        scripted.push(204, "");
        let (client, log) = client(scripted);

        let team = Entity::from_data(
            &client,
            &TEAMS,
            json!({"id": "PTEAM1", "name": "sre"}).as_object().cloned().unwrap(),
        );
        let user = Entity::from_data(
            &client,
            &USERS,
            json!({"id": "PUSER01"}).as_object().cloned().unwrap(),
        );

        add_user(&team, &user).unwrap();
        add_user(&team, "PUSER02").unwrap();

        let requests = log.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].url.path(), "/teams/PTEAM1/users/PUSER01");
        assert_eq!(requests[1].url.path(), "/teams/PTEAM1/users/PUSER02");
    }

    #[test]
    fn reference_without_id_is_invalid() {
        let (client, log) = client(Scripted::new());
        let team = Entity::from_data(
            &client,
            &TEAMS,
            json!({"id": "PTEAM1"}).as_object().cloned().unwrap(),
        );
        let anonymous = Entity::from_data(&client, &USERS, serde_json::Map::new());

        assert!(matches!(
            add_user(&team, &anonymous),
            Err(Error::InvalidArguments { .. })
        ));
        assert!(log.requests().is_empty());
    }
}
