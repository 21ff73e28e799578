use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_client::aggregate::ClientId;
use contracts::domain::a002_visa_application::aggregate::VisaApplicationId;
use contracts::domain::a005_payment::aggregate::{
    DiscountType, Payment, PaymentId, PaymentMethod, PaymentStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub client_id: i64,
    pub visa_application_id: Option<i64>,
    pub amount: f64,
    pub currency: String,
    pub discount: f64,
    pub discount_type: Option<String>,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub payment_requested_date: Option<String>,
    pub payment_received_date: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Payment {
            base: BaseAggregate::with_metadata(
                PaymentId::new(m.id),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            client_id: ClientId::new(m.client_id),
            visa_application_id: m.visa_application_id.map(VisaApplicationId::new),
            amount: m.amount,
            currency: m.currency,
            discount: m.discount,
            discount_type: m.discount_type.as_deref().and_then(DiscountType::from_str),
            payment_status: PaymentStatus::from_str(&m.payment_status),
            payment_method: m.payment_method.as_deref().and_then(PaymentMethod::from_str),
            payment_requested_date: m.payment_requested_date,
            payment_received_date: m.payment_received_date,
            transaction_id: m.transaction_id,
            notes: m.notes,
        }
    }
}

fn to_active_model(payment: &Payment) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(payment.base.code.clone()),
        description: Set(payment.base.description.clone()),
        comment: Set(payment.base.comment.clone()),
        client_id: Set(payment.client_id.value()),
        visa_application_id: Set(payment.visa_application_id.map(|id| id.value())),
        amount: Set(payment.amount),
        currency: Set(payment.currency.clone()),
        discount: Set(payment.discount),
        discount_type: Set(payment.discount_type.map(|t| t.as_str().to_string())),
        payment_status: Set(payment.payment_status.as_str().to_string()),
        payment_method: Set(payment.payment_method.map(|m| m.as_str().to_string())),
        payment_requested_date: Set(payment.payment_requested_date.clone()),
        payment_received_date: Set(payment.payment_received_date.clone()),
        transaction_id: Set(payment.transaction_id.clone()),
        notes: Set(payment.notes.clone()),
        is_deleted: Set(payment.base.metadata.is_deleted),
        created_at: Set(Some(payment.base.metadata.created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(payment.base.metadata.version),
    }
}

pub async fn get_by_id(id: i64) -> Result<Option<Payment>> {
    let db = get_connection();
    let model = Entity::find_by_id(id)
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Payment>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn list_by_client(client_id: i64) -> Result<Vec<Payment>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ClientId.eq(client_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn insert(payment: &Payment) -> Result<i64> {
    let db = get_connection();
    let am = to_active_model(payment);
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

pub async fn update(payment: &Payment) -> Result<()> {
    let db = get_connection();
    let mut am = to_active_model(payment);
    am.id = Set(payment.base.id.value());
    am.version = Set(payment.base.metadata.version + 1);
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
