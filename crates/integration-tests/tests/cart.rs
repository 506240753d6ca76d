//! Integration tests for the cart and checkout.

#![allow(clippy::unwrap_used)]

use green_wally_integration_tests::{TestServer, location};
use reqwest::StatusCode;

/// Seeded ids follow the built-in catalog order.
const RICE: i64 = 1;
const MILK: i64 = 2;

async fn quantity(server: &TestServer, username: &str, product_id: i64) -> Option<i64> {
    sqlx::query_scalar(
        "SELECT ci.quantity FROM cart_items ci JOIN users u ON u.id = ci.user_id
         WHERE u.username = ? AND ci.product_id = ?",
    )
    .bind(username)
    .bind(product_id)
    .fetch_optional(&server.pool)
    .await
    .unwrap()
}

async fn row_count(server: &TestServer, username: &str) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM cart_items ci JOIN users u ON u.id = ci.user_id WHERE u.username = ?",
    )
    .bind(username)
    .fetch_one(&server.pool)
    .await
    .unwrap()
}

// ============================================================================
// Adding to the cart
// ============================================================================

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();
    server.sign_up_and_in(&client, "lata").await;

    for _ in 0..2 {
        let resp = client
            .post(server.url(&format!("/add_to_cart/{RICE}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/"));
    }

    assert_eq!(quantity(&server, "lata", RICE).await, Some(2));
    assert_eq!(row_count(&server, "lata").await, 1);

    let body = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Product added to cart!"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_not_lost() {
    let server = TestServer::spawn_on_file().await;
    assert!(server.pool.options().get_max_connections() > 1);
    let client = TestServer::client();
    server.sign_up_and_in(&client, "arjun").await;

    let requests = (0..10).map(|_| {
        client
            .post(server.url(&format!("/add_to_cart/{MILK}")))
            .send()
    });
    for resp in spawn_all(requests).await {
        assert_eq!(resp.unwrap().status(), StatusCode::SEE_OTHER);
    }

    assert_eq!(quantity(&server, "arjun", MILK).await, Some(10));
    assert_eq!(row_count(&server, "arjun").await, 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();
    server.sign_up_and_in(&client, "sana").await;

    for path in ["/add_to_cart/9999", "/add_to_cart/rice"] {
        let resp = client.post(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
    assert_eq!(row_count(&server, "sana").await, 0);
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let server = TestServer::spawn().await;
    let first = TestServer::client();
    let second = TestServer::client();
    server.sign_up_and_in(&first, "uma").await;
    server.sign_up_and_in(&second, "vikram").await;

    first
        .post(server.url(&format!("/add_to_cart/{RICE}")))
        .send()
        .await
        .unwrap();

    assert_eq!(row_count(&server, "uma").await, 1);
    assert_eq!(row_count(&server, "vikram").await, 0);

    let body = second.get(server.url("/cart")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Your cart is empty"));
}

// ============================================================================
// Cart view and checkout
// ============================================================================

#[tokio::test]
async fn test_cart_total_and_checkout() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();
    server.sign_up_and_in(&client, "meera").await;

    for id in [RICE, RICE, MILK] {
        client
            .post(server.url(&format!("/add_to_cart/{id}")))
            .send()
            .await
            .unwrap();
    }

    let body = client.get(server.url("/cart")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Rice"));
    assert!(body.contains("Milk"));
    assert!(body.contains("90.00"));
    assert!(body.contains("122.00"));

    let body = client.get(server.url("/checkout")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("122.00"));
    assert_eq!(row_count(&server, "meera").await, 2);

    let resp = client
        .post(server.url("/checkout"))
        .form(&[
            ("card_name", "Meera"),
            ("card_number", "4111 1111 1111 1111"),
            ("expiry", "12/30"),
            ("cvv", "123"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Payment successful!"));

    assert_eq!(row_count(&server, "meera").await, 0);
    let body = client.get(server.url("/cart")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_of_empty_cart_succeeds() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();
    server.sign_up_and_in(&client, "rohan").await;

    let resp = client.post(server.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Payment successful!"));
}

/// Run a batch of request futures as concurrent tasks and collect the results.
async fn spawn_all<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}
