//! In-memory [`ResourceGroupService`].
//!
//! Member-level authorization goes through the request's [`GroupAccess`], so
//! the same store serves application and environment groups. Deleted groups
//! are deactivated, not removed. Active names are reserved in an index keyed
//! by kind, parent and name, so two concurrent creates cannot both win.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use resource_group_sdk::{
    GroupAccess, PermissionMap, ResourceGroup, ResourceGroupError, ResourceGroupRequest,
    ResourceGroupService, ResourceGroupType, actions,
};
use tracing::debug;

type NameKey = (ResourceGroupType, i32, String);

fn name_key(group_type: ResourceGroupType, parent_resource_id: i32, name: &str) -> NameKey {
    (group_type, parent_resource_id, name.to_owned())
}

#[derive(Debug)]
pub struct InMemoryResourceGroupService {
    groups: DashMap<i32, ResourceGroup>,
    names: DashMap<NameKey, i32>,
    next_id: AtomicI32,
}

impl Default for InMemoryResourceGroupService {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl InMemoryResourceGroupService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active group with this id and kind.
    fn find_active(
        &self,
        id: i32,
        group_type: ResourceGroupType,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        self.groups
            .get(&id)
            .filter(|g| g.active && g.group_type == group_type)
            .map(|g| g.value().clone())
            .ok_or_else(|| ResourceGroupError::not_found(id))
    }

    /// Reserve the request's name for group `id`.
    ///
    /// Succeeds when the name is free or already held by `id`.
    fn reserve_name(
        &self,
        request: &ResourceGroupRequest,
        id: i32,
    ) -> Result<(), ResourceGroupError> {
        let key = name_key(request.group_type, request.parent_resource_id, &request.name);
        match self.names.entry(key) {
            Entry::Occupied(held) if *held.get() != id => {
                Err(ResourceGroupError::conflict(&request.name))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_name(
        &self,
        group_type: ResourceGroupType,
        parent_resource_id: i32,
        name: &str,
        id: i32,
    ) {
        let key = name_key(group_type, parent_resource_id, name);
        self.names.remove_if(&key, |_, held| *held == id);
    }
}

/// Fail unless every object is explicitly allowed.
fn require_all(
    permissions: &PermissionMap,
    objects: &[String],
    action: &str,
) -> Result<(), ResourceGroupError> {
    let denied: Vec<&str> = objects
        .iter()
        .filter(|o| permissions.get(o.as_str()) == Some(&false))
        .map(String::as_str)
        .collect();
    if !denied.is_empty() {
        return Err(ResourceGroupError::forbidden(format!(
            "'{action}' denied on {}",
            denied.join(", ")
        )));
    }

    let unevaluated: Vec<&str> = objects
        .iter()
        .filter(|o| !permissions.contains_key(o.as_str()))
        .map(String::as_str)
        .collect();
    if !unevaluated.is_empty() {
        return Err(ResourceGroupError::internal(format!(
            "'{action}' not evaluated for {}",
            unevaluated.join(", ")
        )));
    }
    Ok(())
}

#[async_trait]
impl ResourceGroupService for InMemoryResourceGroupService {
    async fn get_active_resource_group_list(
        &self,
        access: &GroupAccess,
        parent_resource_id: i32,
        group_type: ResourceGroupType,
    ) -> Result<Vec<ResourceGroup>, ResourceGroupError> {
        let mut candidates: Vec<ResourceGroup> = self
            .groups
            .iter()
            .filter(|e| {
                let g = e.value();
                g.active && g.group_type == group_type && g.parent_resource_id == parent_resource_id
            })
            .map(|e| e.value().clone())
            .collect();
        candidates.sort_by_key(|g| g.id);

        let mut objects: Vec<String> = candidates
            .iter()
            .flat_map(|g| g.resource_ids.iter().map(ToString::to_string))
            .collect();
        objects.sort_unstable();
        objects.dedup();

        let visible = access.check_batch(&objects, actions::GET).await?;

        // Members the caller cannot see are hidden; a group left with none is dropped.
        Ok(candidates
            .into_iter()
            .filter_map(|mut group| {
                let had_members = !group.resource_ids.is_empty();
                group
                    .resource_ids
                    .retain(|id| visible.get(&id.to_string()) == Some(&true));
                (!had_members || !group.resource_ids.is_empty()).then_some(group)
            })
            .collect())
    }

    async fn create_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        let objects = request.member_objects();
        let permissions = access.check_batch(&objects, actions::UPDATE).await?;
        require_all(&permissions, &objects, actions::UPDATE)?;

        let key = name_key(request.group_type, request.parent_resource_id, &request.name);
        let Entry::Vacant(slot) = self.names.entry(key) else {
            return Err(ResourceGroupError::conflict(&request.name));
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let group = ResourceGroup {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            resource_ids: request.resource_ids.clone(),
            active: true,
            parent_resource_id: request.parent_resource_id,
            group_type: request.group_type,
            created_by: request.user_id,
            updated_by: request.user_id,
        };
        self.groups.insert(id, group.clone());
        slot.insert(id);
        debug!(id, name = %group.name, group_type = %group.group_type, "Resource group created");
        Ok(group)
    }

    async fn update_resource_group(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<ResourceGroup, ResourceGroupError> {
        let existing = self.find_active(request.id, request.group_type)?;

        // Removing a member needs the same permission as adding one.
        let mut objects = request.member_objects();
        objects.extend(existing.resource_ids.iter().map(ToString::to_string));
        objects.sort_unstable();
        objects.dedup();
        let permissions = access.check_batch(&objects, actions::UPDATE).await?;
        require_all(&permissions, &objects, actions::UPDATE)?;

        self.reserve_name(request, request.id)?;

        let updated = self
            .groups
            .get_mut(&request.id)
            .filter(|g| g.active)
            .map(|mut entry| {
                let group = entry.value_mut();
                group.name.clone_from(&request.name);
                group.description.clone_from(&request.description);
                group.resource_ids.clone_from(&request.resource_ids);
                group.parent_resource_id = request.parent_resource_id;
                group.updated_by = request.user_id;
                group.clone()
            });
        let Some(updated) = updated else {
            self.release_name(
                request.group_type,
                request.parent_resource_id,
                &request.name,
                request.id,
            );
            return Err(ResourceGroupError::not_found(request.id));
        };

        if existing.name != updated.name
            || existing.parent_resource_id != updated.parent_resource_id
        {
            self.release_name(
                existing.group_type,
                existing.parent_resource_id,
                &existing.name,
                existing.id,
            );
        }
        debug!(id = updated.id, "Resource group updated");
        Ok(updated)
    }

    async fn delete_resource_group(
        &self,
        access: &GroupAccess,
        id: i32,
        group_type: ResourceGroupType,
    ) -> Result<bool, ResourceGroupError> {
        let existing = self.find_active(id, group_type)?;

        let objects: Vec<String> = existing.resource_ids.iter().map(ToString::to_string).collect();
        let permissions = access.check_batch(&objects, actions::DELETE).await?;
        require_all(&permissions, &objects, actions::DELETE)?;

        if let Some(mut group) = self.groups.get_mut(&id) {
            group.active = false;
        }
        self.release_name(group_type, existing.parent_resource_id, &existing.name, id);
        debug!(id, "Resource group deactivated");
        Ok(true)
    }

    async fn check_resource_group_permissions(
        &self,
        access: &GroupAccess,
        request: &ResourceGroupRequest,
    ) -> Result<PermissionMap, ResourceGroupError> {
        Ok(access
            .check_batch(&request.member_objects(), actions::UPDATE)
            .await?)
    }
}
