use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_client::aggregate::{
    Client, ClientId, ClientStatus, ContactMethod, VisaType,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<String>,
    pub passport_number: String,
    pub nationality: String,
    pub country_of_residence: String,
    pub preferred_contact_method: String,
    pub lead_source: String,
    pub client_status: String,
    pub visa_type: Option<String>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Client {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Client {
            base: BaseAggregate::with_metadata(
                ClientId::new(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            date_of_birth: m.date_of_birth,
            passport_number: m.passport_number,
            nationality: m.nationality,
            country_of_residence: m.country_of_residence,
            preferred_contact_method: ContactMethod::from_str(&m.preferred_contact_method),
            lead_source: m.lead_source,
            client_status: ClientStatus::from_str(&m.client_status),
            visa_type: m.visa_type.as_deref().and_then(VisaType::from_str),
            notes: m.notes,
        }
    }
}

fn to_active_model(client: &Client) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(client.base.code.clone()),
        description: Set(client.base.description.clone()),
        comment: Set(client.base.comment.clone()),
        first_name: Set(client.first_name.clone()),
        last_name: Set(client.last_name.clone()),
        email: Set(client.email.clone()),
        phone: Set(client.phone.clone()),
        date_of_birth: Set(client.date_of_birth.clone()),
        passport_number: Set(client.passport_number.clone()),
        nationality: Set(client.nationality.clone()),
        country_of_residence: Set(client.country_of_residence.clone()),
        preferred_contact_method: Set(client.preferred_contact_method.as_str().to_string()),
        lead_source: Set(client.lead_source.clone()),
        client_status: Set(client.client_status.as_str().to_string()),
        visa_type: Set(client.visa_type.map(|v| v.as_str().to_string())),
        notes: Set(client.notes.clone()),
        is_deleted: Set(client.base.metadata.is_deleted),
        created_at: Set(Some(client.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(client.base.metadata.version),
    }
}

pub async fn get_by_id(id: i64) -> Result<Option<Client>> {
    let db = get_connection();
    let model = Entity::find_by_id(id)
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Client>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::LastName)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn insert(client: &Client) -> Result<i64> {
    let db = get_connection();
    let am = to_active_model(client);
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

pub async fn update(client: &Client) -> Result<()> {
    let db = get_connection();
    let mut am = to_active_model(client);
    am.id = Set(client.base.id.value());
    am.version = Set(client.base.metadata.version + 1);
    Entity::update(am).exec(db).await?;
    Ok(())
}

/// Soft delete. Returns false when the record does not exist.
pub async fn soft_delete(id: i64) -> Result<bool> {
    let db = get_connection();
    let Some(model) = Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    let mut am: ActiveModel = model.into();
    am.is_deleted = Set(true);
    am.updated_at = Set(Some(Utc::now()));
    Entity::update(am).exec(db).await?;
    Ok(true)
}

/// Flip a client to "previous" once one of their applications is decided.
pub async fn set_status(id: i64, status: ClientStatus) -> Result<()> {
    let db = get_connection();
    let Some(model) = Entity::find_by_id(id).one(db).await? else {
        return Ok(());
    };
    let mut am: ActiveModel = model.into();
    am.client_status = Set(status.as_str().to_string());
    am.updated_at = Set(Some(Utc::now()));
    Entity::update(am).exec(db).await?;
    Ok(())
}
