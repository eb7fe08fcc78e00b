use uuid::Uuid;

use backoffice_admin::domain::repository::MenuRepository;
use backoffice_admin::domain::types::Menu;
use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::menu::{
    CreateMenuInput, CreateMenuUseCase, DeleteMenuUseCase, GetMenuUseCase, MenuTreeUseCase,
    UpdateMenuInput, UpdateMenuUseCase,
};
use backoffice_domain::kind::{MenuType, Toggle};

use crate::helpers::{MemoryStore, test_role};

fn input(name: &str, parent_id: Option<Uuid>) -> CreateMenuInput {
    CreateMenuInput {
        parent_id,
        name: name.to_owned(),
        path: Some(format!("/{}", name.to_lowercase())),
        component: None,
        icon: None,
        menu_type: MenuType::Menu,
        visible: None,
        sort: None,
        status: None,
        permission_code: None,
    }
}

fn reparent(parent_id: Uuid) -> UpdateMenuInput {
    UpdateMenuInput {
        parent_id: Some(Some(parent_id)),
        ..Default::default()
    }
}

// ── CreateMenuUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_enabled_visible_menu_by_default() {
    let usecase = CreateMenuUseCase {
        repo: MemoryStore::new(),
    };

    let menu = usecase.execute(input("System", None)).await.unwrap();

    assert_eq!(menu.status, Toggle::Enabled);
    assert!(menu.visible);
    assert_eq!(menu.sort, 0);
}

#[tokio::test]
async fn should_reject_unknown_parent_on_create() {
    let usecase = CreateMenuUseCase {
        repo: MemoryStore::new(),
    };

    let result = usecase.execute(input("Orphan", Some(Uuid::now_v7()))).await;

    assert!(
        matches!(result, Err(AdminServiceError::MenuNotFound)),
        "expected MenuNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_fields_longer_than_their_columns() {
    let usecase = CreateMenuUseCase {
        repo: MemoryStore::new(),
    };
    let mut long_path = input("System", None);
    long_path.path = Some("/".repeat(256));
    let mut long_icon = input("System", None);
    long_icon.icon = Some("i".repeat(65));
    let mut long_component = input("System", None);
    long_component.component = Some("c".repeat(256));

    for menu in [long_path, long_icon, long_component] {
        let result = usecase.execute(menu).await;
        assert!(
            matches!(result, Err(AdminServiceError::Invalid(_))),
            "expected Invalid, got {result:?}"
        );
    }
}

// ── UpdateMenuUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_self_and_descendant_parent() {
    let store = MemoryStore::new();
    let create = CreateMenuUseCase { repo: store.clone() };
    let root = create.execute(input("System", None)).await.unwrap();
    let child = create.execute(input("Users", Some(root.id))).await.unwrap();
    let grandchild = create.execute(input("Invite", Some(child.id))).await.unwrap();
    let update = UpdateMenuUseCase { repo: store.clone() };

    for parent in [root.id, child.id, grandchild.id] {
        let result = update.execute(root.id, reparent(parent)).await;
        assert!(
            matches!(result, Err(AdminServiceError::MenuCycle)),
            "expected MenuCycle, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_move_menu_under_sibling() {
    let store = MemoryStore::new();
    let create = CreateMenuUseCase { repo: store.clone() };
    let root = create.execute(input("System", None)).await.unwrap();
    let users = create.execute(input("Users", Some(root.id))).await.unwrap();
    let roles = create.execute(input("Roles", Some(root.id))).await.unwrap();

    let moved = UpdateMenuUseCase { repo: store.clone() }
        .execute(roles.id, reparent(users.id))
        .await
        .unwrap();

    assert_eq!(moved.parent_id, Some(users.id));
}

#[tokio::test]
async fn should_reject_oversized_path_on_update() {
    let store = MemoryStore::new();
    let menu = CreateMenuUseCase { repo: store.clone() }
        .execute(input("System", None))
        .await
        .unwrap();

    let result = UpdateMenuUseCase { repo: store.clone() }
        .execute(
            menu.id,
            UpdateMenuInput {
                path: Some("p".repeat(600)),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AdminServiceError::Invalid("menu path"))));
}

#[tokio::test]
async fn should_reject_second_of_two_crossing_moves() {
    let store = MemoryStore::new();
    let create = CreateMenuUseCase { repo: store.clone() };
    let a = create.execute(input("Alpha", None)).await.unwrap();
    let b = create.execute(input("Beta", None)).await.unwrap();

    // Both writers read the tree while A and B are still roots.
    let b_seen = b.clone();
    UpdateMenuUseCase { repo: store.clone() }
        .execute(a.id, reparent(b.id))
        .await
        .unwrap();
    let result = store
        .update(&Menu {
            parent_id: Some(a.id),
            ..b_seen
        })
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::MenuCycle)),
        "expected MenuCycle, got {result:?}"
    );
    let get = GetMenuUseCase { repo: store.clone() };
    assert_eq!(get.execute(b.id).await.unwrap().parent_id, None);
    assert_eq!(get.execute(a.id).await.unwrap().parent_id, Some(b.id));
}

// ── MenuTreeUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_include_disabled_menus_in_admin_tree() {
    let store = MemoryStore::new();
    let create = CreateMenuUseCase { repo: store.clone() };
    let root = create.execute(input("System", None)).await.unwrap();
    create
        .execute(CreateMenuInput {
            status: Some(Toggle::Disabled),
            ..input("Legacy", Some(root.id))
        })
        .await
        .unwrap();

    let tree = MenuTreeUseCase { repo: store.clone() }.execute().await.unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].name, "Legacy");
}

// ── DeleteMenuUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_block_delete_while_children_exist() {
    let store = MemoryStore::new();
    let create = CreateMenuUseCase { repo: store.clone() };
    let root = create.execute(input("System", None)).await.unwrap();
    let child = create.execute(input("Users", Some(root.id))).await.unwrap();
    let delete = DeleteMenuUseCase { repo: store.clone() };

    let result = delete.execute(root.id).await;
    assert!(
        matches!(result, Err(AdminServiceError::MenuHasChildren)),
        "expected MenuHasChildren, got {result:?}"
    );

    delete.execute(child.id).await.unwrap();
    delete.execute(root.id).await.unwrap();
    assert!(
        MenuTreeUseCase { repo: store.clone() }
            .execute()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn should_remove_role_grants_with_deleted_menu() {
    let store = MemoryStore::new();
    let role = store.insert_role(test_role("viewer"));
    let menu = CreateMenuUseCase { repo: store.clone() }
        .execute(input("Reports", None))
        .await
        .unwrap();
    store.link_role_menu(role, menu.id);

    DeleteMenuUseCase { repo: store.clone() }
        .execute(menu.id)
        .await
        .unwrap();

    assert_eq!(store.grant_counts(), (0, 0, 0));
}

#[tokio::test]
async fn should_report_missing_menu_on_delete() {
    let result = DeleteMenuUseCase {
        repo: MemoryStore::new(),
    }
    .execute(Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(AdminServiceError::MenuNotFound)));
}
