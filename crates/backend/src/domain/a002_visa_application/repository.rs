use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_client::aggregate::{ClientId, VisaType};
use contracts::domain::a002_visa_application::aggregate::{
    ApplicationStage, Decision, VisaApplication, VisaApplicationId,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_visa_application")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub client_id: i64,
    pub visa_type: String,
    pub stage: String,
    pub appointment_date: Option<String>,
    pub appointment_location: Option<String>,
    pub decision: Option<String>,
    pub decision_date: Option<String>,
    pub decision_notes: Option<String>,
    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for VisaApplication {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        VisaApplication {
            base: BaseAggregate::with_metadata(
                VisaApplicationId::new(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            client_id: ClientId::new(m.client_id),
            visa_type: VisaType::from_str(&m.visa_type).unwrap_or(VisaType::Schengen),
            stage: ApplicationStage::from_str(&m.stage),
            appointment_date: m.appointment_date,
            appointment_location: m.appointment_location,
            decision: m.decision.as_deref().and_then(Decision::from_str),
            decision_date: m.decision_date,
            decision_notes: m.decision_notes,
            assigned_agent: m.assigned_agent,
            notes: m.notes,
        }
    }
}

fn to_active_model(app: &VisaApplication) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(app.base.code.clone()),
        description: Set(app.base.description.clone()),
        comment: Set(app.base.comment.clone()),
        client_id: Set(app.client_id.value()),
        visa_type: Set(app.visa_type.as_str().to_string()),
        stage: Set(app.stage.as_str().to_string()),
        appointment_date: Set(app.appointment_date.clone()),
        appointment_location: Set(app.appointment_location.clone()),
        decision: Set(app.decision.map(|d| d.as_str().to_string())),
        decision_date: Set(app.decision_date.clone()),
        decision_notes: Set(app.decision_notes.clone()),
        assigned_agent: Set(app.assigned_agent.clone()),
        notes: Set(app.notes.clone()),
        is_deleted: Set(app.base.metadata.is_deleted),
        created_at: Set(Some(app.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(app.base.metadata.version),
    }
}

pub async fn get_by_id(id: i64) -> Result<Option<VisaApplication>> {
    let db = get_connection();
    let model = Entity::find_by_id(id)
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<VisaApplication>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// All live applications of one client, newest first.
/// The invoice picker's source of available line items.
pub async fn list_by_client(client_id: i64) -> Result<Vec<VisaApplication>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn insert(app: &VisaApplication) -> Result<i64> {
    let db = get_connection();
    let am = to_active_model(app);
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

pub async fn update(app: &VisaApplication) -> Result<()> {
    let db = get_connection();
    let mut am = to_active_model(app);
    am.id = Set(app.base.id.value());
    am.version = Set(app.base.metadata.version + 1);
    Entity::update(am).exec(db).await?;
    Ok(())
}

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
