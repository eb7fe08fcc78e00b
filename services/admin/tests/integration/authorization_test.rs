use std::collections::BTreeSet;

use uuid::Uuid;

use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::role::{
    DeleteRoleUseCase, GrantRoleMenuUseCase, GrantRolePermissionUseCase, RestoreRoleUseCase,
    SetRoleStatusUseCase,
};
use backoffice_admin::usecase::user::GrantUserRoleUseCase;
use backoffice_domain::kind::{RoleStatus, Toggle};
use backoffice_domain::menu_tree::MenuNode;
use backoffice_domain::permission::{WILDCARD, codes};

use crate::helpers::{
    MemoryStore, resolver, test_menu, test_permission, test_role, test_user,
};

fn codes_of(auth: &backoffice_domain::permission::Authorization) -> Vec<&str> {
    auth.permissions.iter().map(String::as_str).collect()
}

fn shape(forest: &[MenuNode]) -> Vec<(String, Vec<String>)> {
    forest
        .iter()
        .map(|node| {
            (
                node.name.clone(),
                node.children.iter().map(|c| c.name.clone()).collect(),
            )
        })
        .collect()
}

/// admin holds `user:manage` and the Users menu; viewer holds the Reports
/// menu, a child of Users. Alice holds both roles.
struct AdminViewer {
    store: MemoryStore,
    alice: Uuid,
    admin: Uuid,
    viewer: Uuid,
}

fn admin_viewer() -> AdminViewer {
    let store = MemoryStore::new();
    let alice = store.insert_user(test_user("alice"));
    let admin = store.insert_role(test_role("admin"));
    let viewer = store.insert_role(test_role("viewer"));
    let manage = store.insert_permission(test_permission(codes::USER_MANAGE));
    let users = store.insert_menu(test_menu("Users", None, 1));
    let reports = store.insert_menu(test_menu("Reports", Some(users), 1));

    store.link_user_role(alice, admin);
    store.link_user_role(alice, viewer);
    store.link_role_permission(admin, manage);
    store.link_role_menu(admin, users);
    store.link_role_menu(viewer, reports);
    AdminViewer {
        store,
        alice,
        admin,
        viewer,
    }
}

// ── ResolveAuthorizationUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_resolve_union_of_role_grants_into_forest() {
    let fx = admin_viewer();

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();

    assert_eq!(codes_of(&auth), vec!["user:manage"]);
    assert_eq!(
        shape(&auth.menus),
        vec![("Users".to_owned(), vec!["Reports".to_owned()])]
    );
    let roles: Vec<&str> = auth.roles.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(roles, vec!["admin", "viewer"]);
}

#[tokio::test]
async fn should_drop_menus_of_deactivated_role() {
    let fx = admin_viewer();
    SetRoleStatusUseCase {
        repo: fx.store.clone(),
    }
    .execute(fx.viewer, RoleStatus::Inactive)
    .await
    .unwrap();

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();

    assert_eq!(codes_of(&auth), vec!["user:manage"]);
    assert_eq!(shape(&auth.menus), vec![("Users".to_owned(), vec![])]);
}

#[tokio::test]
async fn should_promote_reachable_child_to_root_when_parent_is_not_granted() {
    let fx = admin_viewer();
    fx.store.set_role_status(fx.admin, RoleStatus::Inactive);

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();

    assert!(auth.permissions.is_empty());
    assert_eq!(shape(&auth.menus), vec![("Reports".to_owned(), vec![])]);
}

#[tokio::test]
async fn should_ignore_soft_deleted_role_until_restored() {
    let fx = admin_viewer();
    DeleteRoleUseCase {
        repo: fx.store.clone(),
    }
    .execute(fx.admin)
    .await
    .unwrap();

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();
    assert!(auth.permissions.is_empty());

    RestoreRoleUseCase {
        repo: fx.store.clone(),
    }
    .execute(fx.admin)
    .await
    .unwrap();

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();
    assert_eq!(codes_of(&auth), vec!["user:manage"]);
}

#[tokio::test]
async fn should_return_empty_authorization_for_user_without_roles() {
    let store = MemoryStore::new();
    let bob = store.insert_user(test_user("bob"));

    let auth = resolver(&store).execute(bob).await.unwrap();

    assert!(auth.is_empty());
}

#[tokio::test]
async fn should_return_empty_authorization_when_every_role_is_inactive() {
    let fx = admin_viewer();
    fx.store.set_role_status(fx.admin, RoleStatus::Inactive);
    fx.store.set_role_status(fx.viewer, RoleStatus::Inactive);

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();

    assert!(auth.is_empty());
}

#[tokio::test]
async fn should_fail_with_user_not_found_for_unknown_user() {
    let fx = admin_viewer();

    let result = resolver(&fx.store).execute(Uuid::now_v7()).await;

    assert!(
        matches!(result, Err(AdminServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_exclude_disabled_menus() {
    let store = MemoryStore::new();
    let carol = store.insert_user(test_user("carol"));
    let ops = store.insert_role(test_role("ops"));
    let live = store.insert_menu(test_menu("Dashboard", None, 0));
    let hidden = store.insert_menu(test_menu("Legacy", None, 1));
    store.set_menu_status(hidden, Toggle::Disabled);
    store.link_user_role(carol, ops);
    store.link_role_menu(ops, live);
    store.link_role_menu(ops, hidden);

    let auth = resolver(&store).execute(carol).await.unwrap();

    assert_eq!(shape(&auth.menus), vec![("Dashboard".to_owned(), vec![])]);
}

#[tokio::test]
async fn should_not_depend_on_grant_order() {
    let build = |reverse: bool| {
        let store = MemoryStore::new();
        let user = test_user("dave");
        let user_id = user.id;
        store.insert_user(user);
        let roles: Vec<_> = ["editor", "auditor"]
            .into_iter()
            .map(|code| store.insert_role(test_role(code)))
            .collect();
        let perms: Vec<_> = ["dict:read", "menu:read", "user:read"]
            .into_iter()
            .map(|code| store.insert_permission(test_permission(code)))
            .collect();
        let root = store.insert_menu(test_menu("System", None, 0));
        let menus = vec![
            root,
            store.insert_menu(test_menu("Dictionaries", Some(root), 2)),
            store.insert_menu(test_menu("Menus", Some(root), 1)),
        ];

        let mut grants: Vec<(usize, usize, usize)> = vec![(0, 0, 0), (0, 1, 1), (1, 2, 2), (1, 1, 0)];
        if reverse {
            grants.reverse();
        }
        for (role, perm, menu) in grants {
            store.link_user_role(user_id, roles[role]);
            store.link_role_permission(roles[role], perms[perm]);
            store.link_role_menu(roles[role], menus[menu]);
        }
        (store, user_id)
    };

    let (forward, forward_user) = build(false);
    let (backward, backward_user) = build(true);
    let a = resolver(&forward).execute(forward_user).await.unwrap();
    let b = resolver(&backward).execute(backward_user).await.unwrap();

    assert_eq!(codes_of(&a), codes_of(&b));
    assert_eq!(shape(&a.menus), shape(&b.menus));
    assert_eq!(
        shape(&a.menus),
        vec![(
            "System".to_owned(),
            vec!["Menus".to_owned(), "Dictionaries".to_owned()]
        )]
    );
}

#[tokio::test]
async fn should_keep_result_unchanged_after_duplicate_grants() {
    let fx = admin_viewer();
    let before = resolver(&fx.store).execute(fx.alice).await.unwrap();
    let counts = fx.store.grant_counts();

    let manage = fx
        .store
        .tables
        .lock()
        .unwrap()
        .permissions
        .iter()
        .find(|p| p.code == codes::USER_MANAGE)
        .map(|p| p.id)
        .unwrap();
    let users_menu = before.menus[0].id;

    GrantUserRoleUseCase {
        users: fx.store.clone(),
        roles: fx.store.clone(),
        grants: fx.store.clone(),
    }
    .execute(fx.alice, fx.admin)
    .await
    .unwrap();
    GrantRolePermissionUseCase {
        roles: fx.store.clone(),
        permissions: fx.store.clone(),
        grants: fx.store.clone(),
    }
    .execute(fx.admin, manage)
    .await
    .unwrap();
    GrantRoleMenuUseCase {
        roles: fx.store.clone(),
        menus: fx.store.clone(),
        grants: fx.store.clone(),
    }
    .execute(fx.admin, users_menu)
    .await
    .unwrap();

    let after = resolver(&fx.store).execute(fx.alice).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(fx.store.grant_counts(), counts);
}

#[tokio::test]
async fn should_report_each_menu_once_when_granted_through_two_roles() {
    let fx = admin_viewer();
    let users_menu = resolver(&fx.store).execute(fx.alice).await.unwrap().menus[0].id;
    fx.store.link_role_menu(fx.viewer, users_menu);

    let auth = resolver(&fx.store).execute(fx.alice).await.unwrap();

    let ids: Vec<Uuid> = auth.menus.iter().flat_map(MenuNode::ids).collect();
    let unique: BTreeSet<Uuid> = ids.iter().copied().collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(unique.len(), 2);
}

// ── require ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_allow_granted_code_and_forbid_missing_one() {
    let fx = admin_viewer();
    let resolver = resolver(&fx.store);

    assert!(resolver.require(fx.alice, codes::USER_MANAGE).await.is_ok());
    let result = resolver.require(fx.alice, codes::ROLE_MANAGE).await;
    assert!(
        matches!(result, Err(AdminServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_unknown_caller_as_unauthorized() {
    let fx = admin_viewer();

    let result = resolver(&fx.store)
        .require(Uuid::now_v7(), codes::USER_READ)
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::Unauthorized)),
        "expected Unauthorized, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_every_code_through_wildcard() {
    let store = MemoryStore::new();
    let root = store.insert_user(test_user("root"));
    let super_admin = store.insert_role(test_role("super_admin"));
    let all = store.insert_permission(test_permission(WILDCARD));
    store.link_user_role(root, super_admin);
    store.link_role_permission(super_admin, all);

    let resolver = resolver(&store);
    for code in codes::ALL {
        assert!(resolver.require(root, code).await.is_ok(), "{code} denied");
    }
}
