use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message published on the order topic. The wire form carries the kind in an
/// `event` field: `{"event":"new_order","order_id":"…","user_id":1}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum OrderEvent {
    #[serde(rename = "new_order")]
    Created { order_id: Uuid, user_id: i32 },
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Created { order_id, .. } => *order_id,
        }
    }
}
