use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::role::{
    CreateRoleInput, CreateRoleUseCase, DeleteRoleUseCase, GrantRolePermissionUseCase,
    ListRolesUseCase, RestoreRoleUseCase, UpdateRoleInput, UpdateRoleUseCase,
};
use backoffice_admin::usecase::user::{GrantUserRoleUseCase, RevokeUserRoleUseCase};
use backoffice_domain::kind::RoleStatus;

use crate::helpers::{MemoryStore, test_permission, test_user};

fn input(name: &str, code: &str) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        code: code.to_owned(),
        description: None,
        status: None,
        sort: None,
    }
}

// ── CreateRoleUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_active_role_by_default() {
    let store = MemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };

    let role = usecase.execute(input("Editor", "editor")).await.unwrap();

    assert_eq!(role.status, RoleStatus::Active);
    assert_eq!(role.sort, 0);
    assert!(role.deleted_at.is_none());
    assert_eq!(store.role(role.id), role);
}

#[tokio::test]
async fn should_reject_duplicate_name_and_code_among_live_roles() {
    let store = MemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };
    usecase.execute(input("Editor", "editor")).await.unwrap();

    let by_name = usecase.execute(input("Editor", "editor2")).await;
    assert!(
        matches!(by_name, Err(AdminServiceError::RoleNameTaken)),
        "expected RoleNameTaken, got {by_name:?}"
    );
    let by_code = usecase.execute(input("Editor 2", "editor")).await;
    assert!(
        matches!(by_code, Err(AdminServiceError::RoleCodeTaken)),
        "expected RoleCodeTaken, got {by_code:?}"
    );
}

#[tokio::test]
async fn should_reject_wildcard_and_malformed_codes() {
    let usecase = CreateRoleUseCase {
        repo: MemoryStore::new(),
    };

    for code in ["*", "Editor", "", "has space"] {
        let result = usecase.execute(input("Any", code)).await;
        assert!(
            matches!(result, Err(AdminServiceError::Invalid(_))),
            "code {code:?}: expected Invalid, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_description_longer_than_column() {
    let store = MemoryStore::new();
    let usecase = CreateRoleUseCase { repo: store.clone() };
    let mut long = input("Editor", "editor");
    long.description = Some("d".repeat(256));

    let created = usecase.execute(long).await;
    assert!(matches!(created, Err(AdminServiceError::Invalid("role description"))));

    let role = usecase.execute(input("Editor", "editor")).await.unwrap();
    let updated = UpdateRoleUseCase { repo: store.clone() }
        .execute(
            role.id,
            UpdateRoleInput {
                description: Some("d".repeat(256)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(updated, Err(AdminServiceError::Invalid("role description"))));
    assert_eq!(store.role(role.id).description, "");
}

#[tokio::test]
async fn should_free_name_and_code_once_role_is_soft_deleted() {
    let store = MemoryStore::new();
    let create = CreateRoleUseCase { repo: store.clone() };
    let old = create.execute(input("Editor", "editor")).await.unwrap();
    DeleteRoleUseCase { repo: store.clone() }
        .execute(old.id)
        .await
        .unwrap();

    let new = create.execute(input("Editor", "editor")).await.unwrap();
    assert_ne!(new.id, old.id);

    let restored = RestoreRoleUseCase { repo: store.clone() }.execute(old.id).await;
    assert!(
        matches!(restored, Err(AdminServiceError::RoleNameTaken)),
        "expected RoleNameTaken, got {restored:?}"
    );
}

// ── UpdateRoleUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_allow_update_that_keeps_own_name() {
    let store = MemoryStore::new();
    let role = CreateRoleUseCase { repo: store.clone() }
        .execute(input("Editor", "editor"))
        .await
        .unwrap();

    let updated = UpdateRoleUseCase { repo: store.clone() }
        .execute(
            role.id,
            UpdateRoleInput {
                name: Some("Editor".to_owned()),
                sort: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sort, 5);
}

#[tokio::test]
async fn should_reject_update_to_another_roles_code() {
    let store = MemoryStore::new();
    let create = CreateRoleUseCase { repo: store.clone() };
    create.execute(input("Editor", "editor")).await.unwrap();
    let viewer = create.execute(input("Viewer", "viewer")).await.unwrap();

    let result = UpdateRoleUseCase { repo: store.clone() }
        .execute(
            viewer.id,
            UpdateRoleInput {
                code: Some("editor".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::RoleCodeTaken)),
        "expected RoleCodeTaken, got {result:?}"
    );
}

// ── Soft delete / restore ────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_deleted_roles_unless_asked() {
    let store = MemoryStore::new();
    let create = CreateRoleUseCase { repo: store.clone() };
    let editor = create.execute(input("Editor", "editor")).await.unwrap();
    create.execute(input("Viewer", "viewer")).await.unwrap();
    DeleteRoleUseCase { repo: store.clone() }
        .execute(editor.id)
        .await
        .unwrap();

    let list = ListRolesUseCase { repo: store.clone() };
    assert_eq!(list.execute(false).await.unwrap().len(), 1);
    assert_eq!(list.execute(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_second_delete_with_role_not_found() {
    let store = MemoryStore::new();
    let role = CreateRoleUseCase { repo: store.clone() }
        .execute(input("Editor", "editor"))
        .await
        .unwrap();
    let delete = DeleteRoleUseCase { repo: store.clone() };
    delete.execute(role.id).await.unwrap();

    let result = delete.execute(role.id).await;

    assert!(
        matches!(result, Err(AdminServiceError::RoleNotFound)),
        "expected RoleNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_grants_on_soft_deleted_role() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("erin"));
    let permission = store.insert_permission(test_permission("user:read"));
    let role = CreateRoleUseCase { repo: store.clone() }
        .execute(input("Editor", "editor"))
        .await
        .unwrap();
    DeleteRoleUseCase { repo: store.clone() }
        .execute(role.id)
        .await
        .unwrap();

    let to_user = GrantUserRoleUseCase {
        users: store.clone(),
        roles: store.clone(),
        grants: store.clone(),
    }
    .execute(user, role.id)
    .await;
    let to_role = GrantRolePermissionUseCase {
        roles: store.clone(),
        permissions: store.clone(),
        grants: store.clone(),
    }
    .execute(role.id, permission)
    .await;

    assert!(matches!(to_user, Err(AdminServiceError::RoleNotFound)));
    assert!(matches!(to_role, Err(AdminServiceError::RoleNotFound)));
    assert_eq!(store.grant_counts(), (0, 0, 0));
}

#[tokio::test]
async fn should_treat_revoke_of_missing_grant_as_success() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("frank"));
    let role = CreateRoleUseCase { repo: store.clone() }
        .execute(input("Editor", "editor"))
        .await
        .unwrap();
    let revoke = RevokeUserRoleUseCase {
        users: store.clone(),
        grants: store.clone(),
    };

    revoke.execute(user, role.id).await.unwrap();
    revoke.execute(user, role.id).await.unwrap();

    assert_eq!(store.grant_counts(), (0, 0, 0));
}
