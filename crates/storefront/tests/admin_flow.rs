//! Admin product management flow, including the image upload pipeline.

#![allow(clippy::unwrap_used)]

mod common;

use image::GenericImageView;

use common::{browser, location, login, png_bytes, spawn_backend, spawn_storefront};

#[tokio::test]
async fn create_product_resizes_and_uploads_the_image() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend).await;
    let client = browser();
    login(&client, &storefront, "admin@example.com").await;

    // 1600x800 source: the pipeline must ship an 800x400 JPEG
    let form = reqwest::multipart::Form::new()
        .text("name", "Denim Jacket")
        .text("description", "Heavy denim")
        .text("price", "89.00")
        .part(
            "file",
            reqwest::multipart::Part::bytes(png_bytes(1600, 800))
                .file_name("jacket.png")
                .mime_str("image/png")
                .unwrap(),
        );

    let response = client
        .post(format!("{storefront}/admin/products"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/admin/products?success="));

    // The backend received exactly one prepared image
    let uploads = backend.state.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    let uploaded = &uploads[0];
    assert_eq!(
        image::guess_format(uploaded).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(uploaded).unwrap();
    assert_eq!(
        (decoded.width(), decoded.height()),
        (800, 400),
        "image must be downscaled to the 800px cap"
    );

    // The created product carries the stored image path
    let products = backend.state.products.lock().unwrap().clone();
    let created = products
        .iter()
        .find(|product| product["name"] == "Denim Jacket")
        .expect("product should exist");
    assert!(
        created["imageUrl"]
            .as_str()
            .unwrap()
            .starts_with("/uploads/images/")
    );
}

#[tokio::test]
async fn create_without_required_fields_bounces_back_with_error() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend).await;
    let client = browser();
    login(&client, &storefront, "admin@example.com").await;

    let form = reqwest::multipart::Form::new()
        .text("name", "")
        .text("price", "10.00");

    let response = client
        .post(format!("{storefront}/admin/products"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/admin/products?error="));
    assert!(backend.state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_image_surfaces_generic_upload_error() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend).await;
    let client = browser();
    login(&client, &storefront, "admin@example.com").await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Broken")
        .text("price", "10.00")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"not an image".to_vec())
                .file_name("broken.png")
                .mime_str("image/png")
                .unwrap(),
        );

    let response = client
        .post(format!("{storefront}/admin/products"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let target = location(&response);
    assert!(target.starts_with("/admin/products?error="));
    // The message is the generic upload error, not a decoder detail
    assert!(target.contains("uploaded"));
    assert!(backend.state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_keeps_existing_image_when_no_file_selected() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend).await;
    let client = browser();
    login(&client, &storefront, "admin@example.com").await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Linen Shirt Deluxe")
        .text("description", "Upgraded")
        .text("price", "59.90")
        .text("image_url", "/uploads/images/shirt.jpg");

    let response = client
        .post(format!("{storefront}/admin/products/1"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/admin/products?success="));

    let products = backend.state.products.lock().unwrap().clone();
    let updated = products
        .iter()
        .find(|product| product["id"].as_i64() == Some(1))
        .unwrap();
    assert_eq!(updated["name"], "Linen Shirt Deluxe");
    assert_eq!(updated["imageUrl"], "/uploads/images/shirt.jpg");
    assert!(backend.state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_product_removes_it() {
    let backend = spawn_backend().await;
    let storefront = spawn_storefront(&backend).await;
    let client = browser();
    login(&client, &storefront, "admin@example.com").await;

    let response = client
        .post(format!("{storefront}/admin/products/2/delete"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/admin/products?success="));

    let products = backend.state.products.lock().unwrap().clone();
    assert!(
        !products
            .iter()
            .any(|product| product["id"].as_i64() == Some(2))
    );
}
