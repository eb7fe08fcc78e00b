use uuid::Uuid;

use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::notification::{
    CountUnreadUseCase, DeleteNotificationUseCase, ListNotificationsUseCase, MarkAllReadUseCase,
    MarkReadUseCase, SendNotificationInput, SendNotificationUseCase,
};
use backoffice_domain::kind::NotificationType;
use backoffice_domain::pagination::PageRequest;

use crate::helpers::{MemoryStore, test_user};

async fn send(store: &MemoryStore, user_id: Uuid, title: &str) -> Uuid {
    SendNotificationUseCase {
        users: store.clone(),
        notifications: store.clone(),
    }
    .execute(SendNotificationInput {
        user_id,
        title: title.to_owned(),
        content: "body".to_owned(),
        notification_type: NotificationType::System,
        link: None,
    })
    .await
    .unwrap()
    .id
}

// ── SendNotificationUseCase ──────────────────────────────────────────────────

#[tokio::test]
async fn should_create_notification_unread() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("gina"));
    let id = send(&store, user, "Welcome").await;

    let page = ListNotificationsUseCase { repo: store.clone() }
        .execute(user, false, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, id);
    assert!(!page.items[0].is_read);
    assert!(page.items[0].read_at.is_none());
}

#[tokio::test]
async fn should_reject_notification_for_unknown_user() {
    let store = MemoryStore::new();

    let result = SendNotificationUseCase {
        users: store.clone(),
        notifications: store.clone(),
    }
    .execute(SendNotificationInput {
        user_id: Uuid::now_v7(),
        title: "Hello".to_owned(),
        content: String::new(),
        notification_type: NotificationType::Info,
        link: None,
    })
    .await;

    assert!(
        matches!(result, Err(AdminServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_link_longer_than_column() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("hank"));

    let result = SendNotificationUseCase {
        users: store.clone(),
        notifications: store.clone(),
    }
    .execute(SendNotificationInput {
        user_id: user,
        title: "Hello".to_owned(),
        content: String::new(),
        notification_type: NotificationType::Info,
        link: Some(format!("/{}", "x".repeat(255))),
    })
    .await;

    assert!(matches!(result, Err(AdminServiceError::Invalid("link"))));
    let page = ListNotificationsUseCase { repo: store.clone() }
        .execute(user, false, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

// ── MarkReadUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_first_read_at_on_second_mark_read() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("gina"));
    let id = send(&store, user, "Welcome").await;
    let usecase = MarkReadUseCase { repo: store.clone() };

    let first = usecase.execute(user, id).await.unwrap();
    let second = usecase.execute(user, id).await.unwrap();

    assert!(first.is_read);
    assert!(first.read_at.is_some());
    assert_eq!(second.read_at, first.read_at);
    assert!(second.is_read);
}

#[tokio::test]
async fn should_hide_other_users_notification() {
    let store = MemoryStore::new();
    let owner = store.insert_user(test_user("gina"));
    let other = store.insert_user(test_user("hank"));
    let id = send(&store, owner, "Private").await;

    let read = MarkReadUseCase { repo: store.clone() }.execute(other, id).await;
    let delete = DeleteNotificationUseCase { repo: store.clone() }
        .execute(other, id)
        .await;

    assert!(
        matches!(read, Err(AdminServiceError::NotificationNotFound)),
        "expected NotificationNotFound, got {read:?}"
    );
    assert!(matches!(delete, Err(AdminServiceError::NotificationNotFound)));
    let unread = CountUnreadUseCase { repo: store.clone() }
        .execute(owner)
        .await
        .unwrap();
    assert_eq!(unread, 1);
}

// ── MarkAllReadUseCase / CountUnreadUseCase ──────────────────────────────────

#[tokio::test]
async fn should_count_only_transitions_when_marking_all_read() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("gina"));
    let first = send(&store, user, "One").await;
    send(&store, user, "Two").await;
    send(&store, user, "Three").await;
    MarkReadUseCase { repo: store.clone() }
        .execute(user, first)
        .await
        .unwrap();

    let mark_all = MarkAllReadUseCase { repo: store.clone() };
    assert_eq!(mark_all.execute(user).await.unwrap(), 2);
    assert_eq!(mark_all.execute(user).await.unwrap(), 0);

    let unread = CountUnreadUseCase { repo: store.clone() }
        .execute(user)
        .await
        .unwrap();
    assert_eq!(unread, 0);
}

#[tokio::test]
async fn should_filter_unread_only() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("gina"));
    let read = send(&store, user, "Old").await;
    let fresh = send(&store, user, "New").await;
    MarkReadUseCase { repo: store.clone() }
        .execute(user, read)
        .await
        .unwrap();

    let page = ListNotificationsUseCase { repo: store.clone() }
        .execute(user, true, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, fresh);
}

// ── DeleteNotificationUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_notification() {
    let store = MemoryStore::new();
    let user = store.insert_user(test_user("gina"));
    let id = send(&store, user, "Bye").await;
    let delete = DeleteNotificationUseCase { repo: store.clone() };

    delete.execute(user, id).await.unwrap();

    let again = delete.execute(user, id).await;
    assert!(matches!(again, Err(AdminServiceError::NotificationNotFound)));
}
