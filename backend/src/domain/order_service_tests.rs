//! Behaviour coverage for the order workflow service against mocked ports.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockCartGateway, MockOrderRepository, MockProductCatalog, MockUserDirectory, OrderItemView,
    UserProfile,
};
use crate::domain::{ErrorCode, OrderDraft, OrderItemDraft};

type Service =
    OrderWorkflowService<MockOrderRepository, MockCartGateway, MockProductCatalog, MockUserDirectory>;

const OWNER: &str = "shopper@example.com";
const ADDRESS: &str = "12 Rose Lane";

fn service(
    orders: MockOrderRepository,
    cart: MockCartGateway,
    catalog: MockProductCatalog,
    directory: MockUserDirectory,
) -> Service {
    OrderWorkflowService::new(
        Arc::new(orders),
        Arc::new(cart),
        Arc::new(catalog),
        Arc::new(directory),
    )
}

fn requester() -> Requester {
    Requester::user(OWNER)
}

fn profile() -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        email: OWNER.to_owned(),
        address: ADDRESS.to_owned(),
    }
}

fn directory_with_profile() -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_email()
        .withf(|email| email == OWNER)
        .returning(|_| Ok(Some(profile())));
    directory
}

fn catalog_product(id: Uuid, name: &str, price: Decimal) -> CatalogProduct {
    CatalogProduct {
        id,
        name: name.to_owned(),
        price,
        stock_quantity: 100,
        image_path: Some(format!("/images/{name}.jpg")),
        category: Some("garden".to_owned()),
    }
}

fn order_with_lines(lines: &[(Uuid, u32, Decimal)]) -> Order {
    Order::new(OrderDraft {
        user_email: OWNER.to_owned(),
        address: ADDRESS.to_owned(),
        ordered_at: Utc::now(),
        items: lines
            .iter()
            .map(|(product_id, quantity, unit_price)| OrderItemDraft {
                product_id: *product_id,
                quantity: *quantity,
                unit_price: *unit_price,
            })
            .collect(),
    })
    .expect("valid order draft")
}

fn confirmed_order_with_lines(lines: &[(Uuid, u32, Decimal)]) -> Order {
    let mut order = order_with_lines(lines);
    order.confirm().expect("pending order confirms");
    order
}

mod place_order {
    use super::*;

    struct PlaceOrderFixture {
        product_a: Uuid,
        product_b: Uuid,
        cart_item_a: Uuid,
        cart_item_b: Uuid,
    }

    impl PlaceOrderFixture {
        fn new() -> Self {
            Self {
                product_a: Uuid::new_v4(),
                product_b: Uuid::new_v4(),
                cart_item_a: Uuid::new_v4(),
                cart_item_b: Uuid::new_v4(),
            }
        }

        /// Cart holding A (qty 2) and B (qty 1).
        fn cart(&self) -> MockCartGateway {
            let lines = vec![
                CartLine {
                    cart_item_id: self.cart_item_a,
                    product_id: self.product_a,
                    quantity: 2,
                },
                CartLine {
                    cart_item_id: self.cart_item_b,
                    product_id: self.product_b,
                    quantity: 1,
                },
            ];
            let mut cart = MockCartGateway::new();
            cart.expect_fetch_cart()
                .withf(|email| email == OWNER)
                .returning(move |_| Ok(lines.clone()));
            cart
        }

        /// Catalog pricing A at 10.00 and B at 5.00.
        fn catalog(&self) -> MockProductCatalog {
            let product_a = self.product_a;
            let product_b = self.product_b;
            let mut catalog = MockProductCatalog::new();
            catalog.expect_products_by_ids().returning(move |_| {
                Ok(vec![
                    catalog_product(product_a, "rose", Decimal::new(1000, 2)),
                    catalog_product(product_b, "tulip", Decimal::new(500, 2)),
                ])
            });
            catalog
        }

        fn request(&self) -> PlaceOrderRequest {
            PlaceOrderRequest {
                requester: requester(),
                cart_item_ids: vec![self.cart_item_a, self.cart_item_b],
                address_override: None,
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn computes_snapshot_total_and_confirms() {
        let fixture = PlaceOrderFixture::new();
        let expected_total = Decimal::new(2500, 2);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .withf(move |order| {
                order.total_price() == expected_total
                    && order.status() == OrderStatus::Pending
                    && order.address() == ADDRESS
                    && order.items().len() == 2
            })
            .times(1)
            .returning(|_| Ok(()));
        orders
            .expect_set_order_and_item_statuses()
            .withf(|_, status| *status == OrderStatus::Ordered)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut cart = fixture.cart();
        let consumed = vec![fixture.cart_item_a, fixture.cart_item_b];
        cart.expect_remove_items()
            .withf(move |email, ids| email == OWNER && ids == consumed.as_slice())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut catalog = fixture.catalog();
        let (product_a, product_b) = (fixture.product_a, fixture.product_b);
        catalog
            .expect_decrement_stock()
            .withf(move |id, qty| *id == product_a && *qty == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        catalog
            .expect_decrement_stock()
            .withf(move |id, qty| *id == product_b && *qty == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(orders, cart, catalog, directory_with_profile());
        let view = service
            .place_order(fixture.request())
            .await
            .expect("order placed");

        assert_eq!(view.total_price, expected_total);
        assert_eq!(view.status, OrderStatus::Ordered);
        assert!(
            view.items
                .iter()
                .all(|item| item.status == OrderStatus::Ordered)
        );
        assert!(view.items.iter().all(|item| item.product_name.is_some()));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_selection_is_invalid_and_persists_nothing() {
        let service = service(
            MockOrderRepository::new(),
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .place_order(PlaceOrderRequest {
                requester: requester(),
                cart_item_ids: Vec::new(),
                address_override: None,
            })
            .await
            .expect_err("empty selection rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn non_matching_selection_is_invalid_and_persists_nothing() {
        let fixture = PlaceOrderFixture::new();
        let service = service(
            MockOrderRepository::new(),
            fixture.cart(),
            MockProductCatalog::new(),
            directory_with_profile(),
        );
        let err = service
            .place_order(PlaceOrderRequest {
                requester: requester(),
                cart_item_ids: vec![Uuid::new_v4()],
                address_override: None,
            })
            .await
            .expect_err("stray selection rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().returning(|_| Ok(None));
        let service = service(
            MockOrderRepository::new(),
            MockCartGateway::new(),
            MockProductCatalog::new(),
            directory,
        );
        let err = service
            .place_order(PlaceOrderRequest {
                requester: requester(),
                cart_item_ids: vec![Uuid::new_v4()],
                address_override: None,
            })
            .await
            .expect_err("unknown user rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_cart_is_service_unavailable() {
        let mut cart = MockCartGateway::new();
        cart.expect_fetch_cart()
            .returning(|_| Err(CartGatewayError::unreachable("connect timeout")));
        let service = service(
            MockOrderRepository::new(),
            cart,
            MockProductCatalog::new(),
            directory_with_profile(),
        );
        let err = service
            .place_order(PlaceOrderRequest {
                requester: requester(),
                cart_item_ids: vec![Uuid::new_v4()],
                address_override: None,
            })
            .await
            .expect_err("unreachable cart surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_product_aborts_whole_order() {
        let fixture = PlaceOrderFixture::new();
        let product_a = fixture.product_a;
        let mut catalog = MockProductCatalog::new();
        // Catalog only knows product A; B is gone.
        catalog.expect_products_by_ids().returning(move |_| {
            Ok(vec![catalog_product(product_a, "rose", Decimal::new(1000, 2))])
        });
        let service = service(
            MockOrderRepository::new(),
            fixture.cart(),
            catalog,
            directory_with_profile(),
        );
        let err = service
            .place_order(fixture.request())
            .await
            .expect_err("missing product aborts");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn stock_decrement_failure_leaves_order_pending() {
        let fixture = PlaceOrderFixture::new();

        let mut orders = MockOrderRepository::new();
        orders.expect_create().times(1).returning(|_| Ok(()));
        orders.expect_set_order_and_item_statuses().never();

        let mut cart = fixture.cart();
        cart.expect_remove_items().returning(|_, _| Ok(()));

        let mut catalog = fixture.catalog();
        catalog
            .expect_decrement_stock()
            .returning(|_, _| Err(ProductCatalogError::unreachable("503 from catalog")));

        let service = service(orders, cart, catalog, directory_with_profile());
        let err = service
            .place_order(fixture.request())
            .await
            .expect_err("decrement failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn cart_cleanup_failure_is_logged_and_order_still_confirms() {
        let fixture = PlaceOrderFixture::new();

        let mut orders = MockOrderRepository::new();
        orders.expect_create().times(1).returning(|_| Ok(()));
        orders
            .expect_set_order_and_item_statuses()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut cart = fixture.cart();
        cart.expect_remove_items()
            .returning(|_, _| Err(CartGatewayError::unreachable("cart down")));

        let mut catalog = fixture.catalog();
        catalog.expect_decrement_stock().returning(|_, _| Ok(()));

        let service = service(orders, cart, catalog, directory_with_profile());
        let view = service
            .place_order(fixture.request())
            .await
            .expect("order placed despite cart cleanup failure");
        assert_eq!(view.status, OrderStatus::Ordered);
    }

    #[rstest]
    #[tokio::test]
    async fn address_override_replaces_directory_default() {
        let fixture = PlaceOrderFixture::new();

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .withf(|order| order.address() == "1 Override Way")
            .times(1)
            .returning(|_| Ok(()));
        orders
            .expect_set_order_and_item_statuses()
            .returning(|_, _| Ok(()));

        let mut cart = fixture.cart();
        cart.expect_remove_items().returning(|_, _| Ok(()));
        let mut catalog = fixture.catalog();
        catalog.expect_decrement_stock().returning(|_, _| Ok(()));

        let service = service(orders, cart, catalog, directory_with_profile());
        let mut request = fixture.request();
        request.address_override = Some("1 Override Way".to_owned());
        service.place_order(request).await.expect("order placed");
    }
}

mod cancel_order {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn restores_stock_then_cancels() {
        let product_a = Uuid::new_v4();
        let product_b = Uuid::new_v4();
        let order = confirmed_order_with_lines(&[
            (product_a, 2, Decimal::new(1000, 2)),
            (product_b, 1, Decimal::new(500, 2)),
        ]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .withf(move |id| *id == order_id)
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_set_order_and_item_statuses()
            .withf(move |id, status| *id == order_id && *status == OrderStatus::Canceled)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut catalog = MockProductCatalog::new();
        let expected: HashMap<Uuid, u32> = HashMap::from([(product_a, 2), (product_b, 1)]);
        catalog
            .expect_restore_stock()
            .withf(move |quantities| *quantities == expected)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        service
            .cancel_order(CancelOrderRequest {
                requester: requester(),
                order_id,
            })
            .await
            .expect("order cancels");
    }

    #[rstest]
    #[tokio::test]
    async fn already_canceled_is_conflict_and_never_restores_again() {
        let mut order = order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        order.cancel().expect("pending order cancels");
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders.expect_set_order_and_item_statuses().never();

        let mut catalog = MockProductCatalog::new();
        catalog.expect_restore_stock().never();

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let err = service
            .cancel_order(CancelOrderRequest {
                requester: requester(),
                order_id,
            })
            .await
            .expect_err("double cancel rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn restore_failure_leaves_order_unchanged() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders.expect_set_order_and_item_statuses().never();

        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_restore_stock()
            .returning(|_| Err(ProductCatalogError::unreachable("catalog down")));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let err = service
            .cancel_order(CancelOrderRequest {
                requester: requester(),
                order_id,
            })
            .await
            .expect_err("restore failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .cancel_order(CancelOrderRequest {
                requester: Requester::user("other@example.com"),
                order_id,
            })
            .await
            .expect_err("stranger rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_may_cancel_any_order() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_set_order_and_item_statuses()
            .returning(|_, _| Ok(()));

        let mut catalog = MockProductCatalog::new();
        catalog.expect_restore_stock().returning(|_| Ok(()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        service
            .cancel_order(CancelOrderRequest {
                requester: Requester::admin("ops@example.com"),
                order_id,
            })
            .await
            .expect("admin cancels");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().returning(|_| Ok(None));
        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .cancel_order(CancelOrderRequest {
                requester: requester(),
                order_id: Uuid::new_v4(),
            })
            .await
            .expect_err("unknown order rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

mod update_item_status {
    use super::*;

    fn request_for(item_id: Uuid, status: &str) -> UpdateOrderItemStatusRequest {
        UpdateOrderItemStatusRequest {
            requester: requester(),
            order_item_id: item_id,
            status: status.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn canceling_last_item_cascades_to_the_order() {
        let product = Uuid::new_v4();
        let order = confirmed_order_with_lines(&[(product, 3, Decimal::new(700, 2))]);
        let order_id = order.id();
        let item = order.items().first().cloned().expect("order has an item");
        let item_id = item.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_find_item()
            .withf(move |id| *id == item_id)
            .returning(move |_| Ok(Some(item.clone())));
        orders
            .expect_set_item_status()
            .withf(move |id, status| *id == item_id && *status == OrderStatus::Canceled)
            .times(1)
            .returning(|_, _| Ok(()));
        // After the item flips, the re-read shows every sibling canceled.
        orders.expect_items_for_order().returning(move |_| {
            Ok(vec![
                crate::domain::OrderItem::restore(crate::domain::OrderItemRecord {
                    id: item_id,
                    order_id,
                    product_id: product,
                    quantity: 3,
                    unit_price: Decimal::new(700, 2),
                    status: OrderStatus::Canceled,
                })
                .expect("valid item record"),
            ])
        });
        orders
            .expect_set_order_and_item_statuses()
            .withf(move |id, status| *id == order_id && *status == OrderStatus::Canceled)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut catalog = MockProductCatalog::new();
        let expected: HashMap<Uuid, u32> = HashMap::from([(product, 3)]);
        catalog
            .expect_restore_stock()
            .withf(move |quantities| *quantities == expected)
            .times(1)
            .returning(|_| Ok(()));
        catalog.expect_products_by_ids().returning(|_| Ok(Vec::new()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        service
            .update_item_status(request_for(item_id, "CANCELED"))
            .await
            .expect("item cancels");
    }

    #[rstest]
    #[tokio::test]
    async fn canceling_a_non_last_item_leaves_the_order_status() {
        let product_a = Uuid::new_v4();
        let product_b = Uuid::new_v4();
        let order = confirmed_order_with_lines(&[
            (product_a, 1, Decimal::ONE),
            (product_b, 2, Decimal::ONE),
        ]);
        let item = order.items().first().cloned().expect("order has items");
        let item_id = item.id();
        let siblings: Vec<OrderItem> = order.items().to_vec();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_find_item()
            .returning(move |_| Ok(Some(item.clone())));
        orders
            .expect_set_item_status()
            .times(1)
            .returning(|_, _| Ok(()));
        // Sibling B is still Ordered, so no cascade.
        orders
            .expect_items_for_order()
            .returning(move |_| Ok(siblings.clone()));
        orders.expect_set_order_and_item_statuses().never();

        let mut catalog = MockProductCatalog::new();
        catalog.expect_restore_stock().returning(|_| Ok(()));
        catalog.expect_products_by_ids().returning(|_| Ok(Vec::new()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        service
            .update_item_status(request_for(item_id, "CANCELED"))
            .await
            .expect("item cancels without cascade");
    }

    #[rstest]
    #[tokio::test]
    async fn same_status_is_a_conflict() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let item = order.items().first().cloned().expect("order has an item");
        let item_id = item.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_find_item()
            .returning(move |_| Ok(Some(item.clone())));
        orders.expect_set_item_status().never();

        let mut catalog = MockProductCatalog::new();
        catalog.expect_restore_stock().never();

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let err = service
            .update_item_status(request_for(item_id, "ORDERED"))
            .await
            .expect_err("no-op transition rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_status_string_is_invalid() {
        let service = service(
            MockOrderRepository::new(),
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .update_item_status(request_for(Uuid::new_v4(), "SHIPPED"))
            .await
            .expect_err("unknown status rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_item().returning(|_| Ok(None));
        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .update_item_status(request_for(Uuid::new_v4(), "CANCELED"))
            .await
            .expect_err("unknown item rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn restore_failure_aborts_without_status_change() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let item = order.items().first().cloned().expect("order has an item");
        let item_id = item.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_find_item()
            .returning(move |_| Ok(Some(item.clone())));
        orders.expect_set_item_status().never();

        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_restore_stock()
            .returning(|_| Err(ProductCatalogError::unreachable("catalog down")));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let err = service
            .update_item_status(request_for(item_id, "CANCELED"))
            .await
            .expect_err("restore failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}

mod update_order_status {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn pending_order_confirms_to_ordered() {
        let order = order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_set_order_and_item_statuses()
            .withf(move |id, status| *id == order_id && *status == OrderStatus::Ordered)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut catalog = MockProductCatalog::new();
        catalog.expect_products_by_ids().returning(|_| Ok(Vec::new()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let view = service
            .update_order_status(UpdateOrderStatusRequest {
                requester: requester(),
                order_id,
                status: "ORDERED".to_owned(),
            })
            .await
            .expect("order confirms");
        assert_eq!(view.status, OrderStatus::Ordered);
    }

    #[rstest]
    #[tokio::test]
    async fn canceled_target_routes_through_stock_restoration() {
        let product = Uuid::new_v4();
        let order = confirmed_order_with_lines(&[(product, 2, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders
            .expect_set_order_and_item_statuses()
            .withf(|_, status| *status == OrderStatus::Canceled)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut catalog = MockProductCatalog::new();
        let expected: HashMap<Uuid, u32> = HashMap::from([(product, 2)]);
        catalog
            .expect_restore_stock()
            .withf(move |quantities| *quantities == expected)
            .times(1)
            .returning(|_| Ok(()));
        catalog.expect_products_by_ids().returning(|_| Ok(Vec::new()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let view = service
            .update_order_status(UpdateOrderStatusRequest {
                requester: requester(),
                order_id,
                status: "CANCELED".to_owned(),
            })
            .await
            .expect("order cancels via status update");
        assert_eq!(view.status, OrderStatus::Canceled);
    }

    #[rstest]
    #[tokio::test]
    async fn backwards_transition_is_a_conflict() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders.expect_set_order_and_item_statuses().never();

        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .update_order_status(UpdateOrderStatusRequest {
                requester: requester(),
                order_id,
                status: "PENDING".to_owned(),
            })
            .await
            .expect_err("backwards transition rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}

mod queries {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn get_order_null_fills_missing_catalog_products() {
        let product_a = Uuid::new_v4();
        let product_b = Uuid::new_v4();
        let order = confirmed_order_with_lines(&[
            (product_a, 1, Decimal::ONE),
            (product_b, 1, Decimal::ONE),
        ]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut catalog = MockProductCatalog::new();
        // Only product A still exists in the catalog.
        catalog.expect_products_by_ids().returning(move |_| {
            Ok(vec![catalog_product(product_a, "rose", Decimal::ONE)])
        });

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let view = service
            .get_order(GetOrderRequest {
                requester: requester(),
                order_id,
            })
            .await
            .expect("order fetched");

        let by_product: HashMap<Uuid, &OrderItemView> =
            view.items.iter().map(|item| (item.product_id, item)).collect();
        assert_eq!(
            by_product
                .get(&product_a)
                .and_then(|item| item.product_name.as_deref()),
            Some("rose")
        );
        assert_eq!(
            by_product.get(&product_b).and_then(|item| item.product_name.clone()),
            None
        );
    }

    #[rstest]
    #[tokio::test]
    async fn get_order_unknown_id_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().returning(|_| Ok(None));
        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .get_order(GetOrderRequest {
                requester: requester(),
                order_id: Uuid::new_v4(),
            })
            .await
            .expect_err("unknown order rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn get_order_denies_non_owner() {
        let order = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let order_id = order.id();

        let mut orders = MockOrderRepository::new();
        let stored = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(
            orders,
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .get_order(GetOrderRequest {
                requester: Requester::user("other@example.com"),
                order_id,
            })
            .await
            .expect_err("stranger rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn listings_exclude_canceled_orders() {
        let live = confirmed_order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        let mut dead = order_with_lines(&[(Uuid::new_v4(), 1, Decimal::ONE)]);
        dead.cancel().expect("pending order cancels");
        let live_id = live.id();

        let mut orders = MockOrderRepository::new();
        let stored = vec![live, dead];
        orders
            .expect_list_by_email()
            .withf(|email| email == OWNER)
            .returning(move |_| Ok(stored.clone()));

        let mut catalog = MockProductCatalog::new();
        catalog.expect_products_by_ids().returning(|_| Ok(Vec::new()));

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let views = service
            .list_orders(ListOrdersRequest {
                requester: requester(),
                owner_email: None,
            })
            .await
            .expect("orders listed");
        assert_eq!(views.len(), 1);
        assert_eq!(views.first().map(|view| view.order_id), Some(live_id));
    }

    #[rstest]
    #[tokio::test]
    async fn listing_another_identity_is_forbidden() {
        let service = service(
            MockOrderRepository::new(),
            MockCartGateway::new(),
            MockProductCatalog::new(),
            MockUserDirectory::new(),
        );
        let err = service
            .list_orders(ListOrdersRequest {
                requester: requester(),
                owner_email: Some("other@example.com".to_owned()),
            })
            .await
            .expect_err("cross-identity listing rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_without_filter_lists_everything() {
        let mut orders = MockOrderRepository::new();
        orders.expect_list_all().times(1).returning(|| Ok(Vec::new()));
        let mut catalog = MockProductCatalog::new();
        catalog.expect_products_by_ids().never();

        let service = service(orders, MockCartGateway::new(), catalog, MockUserDirectory::new());
        let views = service
            .list_orders(ListOrdersRequest {
                requester: Requester::admin("ops@example.com"),
                owner_email: None,
            })
            .await
            .expect("orders listed");
        assert!(views.is_empty());
    }
}
