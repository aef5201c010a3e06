use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::common::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct IsHealthy(pub bool);

impl IsHealthy {
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    pub fn value(&self) -> bool {
        self.0
    }

    pub fn to_result(self) -> Result<IsHealthy, CoreError> {
        if self.0 {
            Ok(self)
        } else {
            Err(CoreError::Unhealthy)
        }
    }
}
