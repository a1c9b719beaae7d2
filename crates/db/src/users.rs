use crate::collection::{load_collection, position, remove_by_id, save_collection};
use crate::ids::{self, Strategy};
use crate::search::Needle;
use crate::Db;
use common::{text, AppError, AppResult, Resource, User, UserFields};
use serde_json::Value;
use tracing::{info, warn};

const RESOURCE: Resource = Resource::User;

/// Id prefix for a role value. Non-string roles use their JSON text.
fn role_initial(role: &Value) -> Option<String> {
    let prefix = match role.as_str() {
        Some(role) => ids::role_prefix(role),
        None if role.is_null() => String::new(),
        None => ids::role_prefix(&role.to_string()),
    };
    (!prefix.is_empty()).then_some(prefix)
}

fn require_role(fields: &UserFields) -> AppResult<Value> {
    fields
        .role
        .clone()
        .filter(|role| role_initial(role).is_some())
        .ok_or_else(|| AppError::BadRequest("role is required".into()))
}

/// `{RoleInitial}-{n}` where `n` counts the users already holding `role`.
fn role_scoped_id(users: &[User], role: &Value) -> String {
    ids::allocate(
        &role_initial(role).unwrap_or_default(),
        Strategy::Count,
        users
            .iter()
            .filter(|u| u.role.as_ref() == Some(role))
            .map(|u| u.id.as_str()),
    )
}

fn matches_query(user: &User, needle: &Needle<'_>) -> bool {
    needle.in_text(text(&user.username))
        || needle.in_text(text(&user.role))
        || needle.in_text(text(&user.field))
        || needle.in_exact(text(&user.dob))
        || needle.in_text(text(&user.location))
        || needle.in_exact(text(&user.phone))
        || needle.in_text(text(&user.email))
}

fn apply(user: &mut User, fields: UserFields) {
    user.username = fields.username;
    user.role = fields.role;
    user.field = fields.field;
    user.dob = fields.dob;
    user.location = fields.location;
    user.phone = fields.phone;
    user.email = fields.email;
    user.password = fields.password;
}

pub async fn list_users(db: &Db, q: Option<&str>) -> Vec<User> {
    let users: Vec<User> = load_collection(db, RESOURCE).await;
    match Needle::parse(q) {
        Some(needle) => users.into_iter().filter(|u| matches_query(u, &needle)).collect(),
        None => users,
    }
}

pub async fn insert_user(db: &Db, fields: UserFields) -> AppResult<User> {
    let role = require_role(&fields)?;
    let _guard = db.lock(RESOURCE).await;
    let mut users: Vec<User> = load_collection(db, RESOURCE).await;

    let mut user = User {
        id: role_scoped_id(&users, &role),
        ..Default::default()
    };
    apply(&mut user, fields);

    users.push(user.clone());
    save_collection(db, RESOURCE, &users).await;
    info!(id = %user.id, %role, "user created");
    Ok(user)
}

/// Replaces the listed fields. A role change re-derives the id from the
/// collection as it was before this update.
pub async fn update_user(db: &Db, id: &str, fields: UserFields) -> AppResult<User> {
    let role = require_role(&fields)?;
    let _guard = db.lock(RESOURCE).await;
    let mut users: Vec<User> = load_collection(db, RESOURCE).await;
    let index = position(&users, id).ok_or(AppError::NotFound(RESOURCE))?;

    let mut updated = users[index].clone();
    if updated.role.as_ref() != Some(&role) {
        updated.id = role_scoped_id(&users, &role);
    }
    apply(&mut updated, fields);

    users[index] = updated.clone();
    save_collection(db, RESOURCE, &users).await;
    info!(old_id = %id, id = %updated.id, "user updated");
    Ok(updated)
}

/// Removes the user and renumbers every survivor per role. Users without a
/// usable role keep their id.
pub async fn delete_user(db: &Db, id: &str) -> AppResult<()> {
    let _guard = db.lock(RESOURCE).await;
    let mut users: Vec<User> = load_collection(db, RESOURCE).await;
    if !remove_by_id(&mut users, id) {
        return Err(AppError::NotFound(RESOURCE));
    }
    save_collection(db, RESOURCE, &users).await;

    ids::renumber(&mut users, |u| {
        let Some(prefix) = u.role.as_ref().and_then(role_initial) else {
            warn!(id = %u.id, "user has no role, id left as is");
            return None;
        };
        let key = u.role.as_ref().map(Value::to_string);
        Some((key, prefix))
    });
    save_collection(db, RESOURCE, &users).await;
    info!(id = %id, remaining = users.len(), "user deleted, ids reassigned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use serde_json::json;

    fn staff(username: &str, role: &str) -> UserFields {
        UserFields {
            username: Some(username.into()),
            role: Some(role.into()),
            dob: Some("1988-02-14".into()),
            location: Some("Ulaanbaatar".into()),
            phone: Some("99112233".into()),
            email: Some(format!("{}@hospital.mn", username.to_lowercase()).into()),
            password: Some("secret".into()),
            ..Default::default()
        }
    }

    async fn ids_of(db: &Db) -> Vec<String> {
        list_users(db, None).await.into_iter().map(|u| u.id).collect()
    }

    #[tokio::test]
    async fn ids_count_up_per_role() {
        let db = Db::in_memory();
        assert_eq!(insert_user(&db, staff("Bat", "Doctor")).await.unwrap().id, "D-1");
        assert_eq!(insert_user(&db, staff("Saraa", "Nurse")).await.unwrap().id, "N-1");
        assert_eq!(insert_user(&db, staff("Dorj", "Doctor")).await.unwrap().id, "D-2");
        assert_eq!(insert_user(&db, staff("Tuya", "Admin")).await.unwrap().id, "A-1");
        assert_eq!(ids_of(&db).await, ["D-1", "N-1", "D-2", "A-1"]);
    }

    #[tokio::test]
    async fn insert_without_role_is_rejected() {
        let db = Db::in_memory();
        let fields = UserFields {
            username: Some("nobody".into()),
            ..Default::default()
        };
        assert!(matches!(
            insert_user(&db, fields).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(list_users(&db, None).await.is_empty());
    }

    #[tokio::test]
    async fn search_spans_text_fields_and_skips_missing_field() {
        let db = Db::in_memory();
        let mut cardio = staff("Bat", "Doctor");
        cardio.field = Some("Cardiology".into());
        insert_user(&db, cardio).await.unwrap();
        insert_user(&db, staff("Saraa", "Nurse")).await.unwrap();

        let hits = list_users(&db, Some("cardio")).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(text(&hits[0].username), Some("Bat"));

        assert_eq!(list_users(&db, Some("NURSE")).await.len(), 1);
        assert_eq!(list_users(&db, Some("9911")).await.len(), 2);
        assert_eq!(list_users(&db, Some("")).await.len(), 2);
        assert!(list_users(&db, Some("surgeon")).await.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_listed_fields_and_drops_unsupplied_ones() {
        let db = Db::in_memory();
        insert_user(&db, staff("Bat", "Doctor")).await.unwrap();

        let fields = UserFields {
            username: Some("Bat-Erdene".into()),
            role: Some("Doctor".into()),
            ..Default::default()
        };
        let updated = update_user(&db, "D-1", fields).await.unwrap();
        assert_eq!(updated.id, "D-1");
        assert_eq!(text(&updated.username), Some("Bat-Erdene"));
        assert_eq!(updated.email, None);
        assert_eq!(list_users(&db, None).await, vec![updated]);
    }

    #[tokio::test]
    async fn role_change_regenerates_id_from_pre_update_collection() {
        let db = Db::in_memory();
        insert_user(&db, staff("Bat", "Doctor")).await.unwrap();
        insert_user(&db, staff("Saraa", "Nurse")).await.unwrap();

        let updated = update_user(&db, "D-1", staff("Bat", "Nurse")).await.unwrap();
        assert_eq!(updated.id, "N-2");
        assert_eq!(ids_of(&db).await, ["N-2", "N-1"]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let db = Db::in_memory();
        let err = update_user(&db, "D-9", staff("Bat", "Doctor"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::User)));
    }

    #[tokio::test]
    async fn delete_renumbers_survivors_per_role() {
        let db = Db::in_memory();
        for (name, role) in [
            ("Bat", "Doctor"),
            ("Saraa", "Nurse"),
            ("Dorj", "Doctor"),
            ("Tuya", "Nurse"),
            ("Oyun", "Doctor"),
        ] {
            insert_user(&db, staff(name, role)).await.unwrap();
        }

        delete_user(&db, "D-1").await.unwrap();
        assert_eq!(ids_of(&db).await, ["N-1", "D-1", "N-2", "D-2"]);

        let names: Vec<_> = list_users(&db, None)
            .await
            .into_iter()
            .filter_map(|u| text(&u.username).map(str::to_owned))
            .collect();
        assert_eq!(names, ["Saraa", "Dorj", "Tuya", "Oyun"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_leaves_collection_unchanged() {
        let db = Db::in_memory();
        insert_user(&db, staff("Bat", "Doctor")).await.unwrap();
        let before = list_users(&db, None).await;

        let err = delete_user(&db, "D-7").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::User)));
        assert_eq!(list_users(&db, None).await, before);
    }

    #[tokio::test]
    async fn users_without_a_role_keep_their_id_on_renumbering() {
        let db = Db::new(MemoryStorage::default().with_document(
            "Staff.json",
            json!([
                {"id": "D-1", "username": "Bat", "role": "Doctor"},
                {"id": "legacy-7", "username": "Ghost"},
                {"id": "D-2", "username": "Dorj", "role": "Doctor"},
                {"id": "X-1", "username": "Blank", "role": ""}
            ])
            .to_string(),
        ));

        delete_user(&db, "D-1").await.unwrap();
        assert_eq!(ids_of(&db).await, ["legacy-7", "D-1", "X-1"]);
    }

    #[tokio::test]
    async fn mistyped_staff_fields_survive_an_insert() {
        let db = Db::new(MemoryStorage::default().with_document(
            "Staff.json",
            json!([{"id": "N-1", "username": "Saraa", "role": "Nurse", "phone": 99112233}])
                .to_string(),
        ));

        let mut fields = staff("Tuya", "Nurse");
        fields.phone = Some(json!(88112233));
        assert_eq!(insert_user(&db, fields).await.unwrap().id, "N-2");

        let users = list_users(&db, None).await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].phone, Some(json!(99112233)));
        assert_eq!(users[1].phone, Some(json!(88112233)));
    }

    #[tokio::test]
    async fn null_or_empty_role_is_rejected() {
        let db = Db::in_memory();
        for role in [Value::Null, json!("")] {
            let mut fields = staff("Bat", "Doctor");
            fields.role = Some(role);
            assert!(matches!(
                insert_user(&db, fields).await,
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
