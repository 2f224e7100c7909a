use checkout::{
    CheckoutCoordinator, CheckoutResult, InMemoryOrderingService, OrderOutcome, Outcome,
    partition_by_restaurant,
};
use common::{CustomerId, MenuItemId, OrderId, RestaurantId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AddressBook, CartLineItem, CartStore, InMemoryAddressBook, InMemoryCartStore, Money,
    NewAddress, NewCartItem, PaymentMethod,
};

fn sample_cart(restaurants: usize, items_per_restaurant: usize) -> Vec<CartLineItem> {
    let mut items = Vec::with_capacity(restaurants * items_per_restaurant);
    for r in 0..restaurants {
        let restaurant_id = RestaurantId::new();
        for _ in 0..items_per_restaurant {
            items.push(CartLineItem::new(
                MenuItemId::new(),
                restaurant_id,
                format!("Restaurant {r}"),
                2,
                Money::from_cents(1250),
            ));
        }
    }
    items
}

fn bench_partition(c: &mut Criterion) {
    let items = sample_cart(10, 10);

    c.bench_function("checkout/partition_100_items", |b| {
        b.iter(|| partition_by_restaurant(&items));
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let outcomes: Vec<OrderOutcome> = (0..10)
        .map(|i| OrderOutcome {
            restaurant_id: RestaurantId::new(),
            restaurant_name: format!("Restaurant {i}"),
            outcome: if i % 3 == 0 {
                Outcome::Failure {
                    error: "kitchen closed".to_string(),
                }
            } else {
                Outcome::Success {
                    order_id: OrderId::new(i),
                }
            },
        })
        .collect();

    c.bench_function("checkout/aggregate_10_outcomes", |b| {
        b.iter(|| CheckoutResult::from_outcomes(&outcomes));
    });
}

fn bench_place_multiple_orders(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("checkout/place_orders_5_restaurants", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cart = InMemoryCartStore::new();
                let addresses = InMemoryAddressBook::new();
                let ordering = InMemoryOrderingService::new();
                let coordinator =
                    CheckoutCoordinator::new(cart.clone(), addresses.clone(), ordering);

                let customer_id = CustomerId::new();
                for item in sample_cart(5, 3) {
                    cart.add_item(
                        customer_id,
                        NewCartItem {
                            menu_item_id: item.menu_item_id,
                            restaurant_id: item.restaurant_id,
                            restaurant_name: item.restaurant_name.clone(),
                            quantity: item.quantity,
                            unit_price: item.unit_price,
                        },
                    )
                    .await
                    .unwrap();
                }
                let address = addresses
                    .create(
                        customer_id,
                        NewAddress {
                            label: None,
                            address_line: "1 Main St".to_string(),
                            coordinates: None,
                        },
                    )
                    .await
                    .unwrap();

                let items = cart.retrieve_cart(customer_id).await.unwrap();
                coordinator
                    .place_multiple_orders(customer_id, &items, &address, PaymentMethod::Cash)
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_partition,
    bench_aggregate,
    bench_place_multiple_orders
);
criterion_main!(benches);
