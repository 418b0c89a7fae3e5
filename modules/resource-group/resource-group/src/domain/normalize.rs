//! Legacy field projection.
//!
//! Application groups used to be addressed by `environmentId` and
//! `appIds`. When present, those win over `parentResourceId` and
//! `resourceIds`. Environment groups never look at them.

use resource_group_sdk::{ResourceGroupPayload, ResourceGroupRequest, ResourceGroupType};

/// Build the service request from a decoded payload.
///
/// `path_parent` is the resource id from the URL, when the route has one; it
/// replaces whatever `parentResourceId` the body carried before the legacy
/// projection runs. `user_id` is the identified caller; a user id sent in the
/// body is never trusted.
#[must_use]
pub fn normalize(
    payload: ResourceGroupPayload,
    kind: ResourceGroupType,
    user_id: i32,
    path_parent: Option<i32>,
) -> ResourceGroupRequest {
    let ResourceGroupPayload {
        id,
        name,
        description,
        resource_ids,
        active,
        environment_id,
        parent_resource_id,
        group_type: _,
        app_ids,
    } = payload;

    let app_ids = app_ids.unwrap_or_default();
    let mut resource_ids = resource_ids.unwrap_or_default();
    let mut parent_resource_id = path_parent.unwrap_or(parent_resource_id);

    if kind == ResourceGroupType::AppGroup {
        if environment_id > 0 {
            parent_resource_id = environment_id;
        }
        if !app_ids.is_empty() {
            resource_ids.clone_from(&app_ids);
        }
    }

    ResourceGroupRequest {
        id,
        name,
        description,
        resource_ids,
        active,
        user_id,
        environment_id,
        parent_resource_id,
        group_type: kind,
        app_ids,
    }
}
