use uuid::Uuid;

use crate::domain::error::DomainError;

/// Resources that belong to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// The `touch` capability: only the owner may read, change or delete.
pub fn is_owner(actor_id: Uuid, owner_id: Uuid) -> bool {
    actor_id == owner_id
}

pub fn authorize_touch<T: Owned>(actor_id: Uuid, resource: &T) -> Result<(), DomainError> {
    if is_owner(actor_id, resource.owner_id()) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
