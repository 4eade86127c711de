//! CSV fixtures shared by the loader and backend tests

use std::fs;
use std::path::Path;

pub const EVENTS_CSV: &str = "\
event_id,session_id,user_id,event_type,created_at,device_type,browser,traffic_source,uri,product_id
1,100,1,home,2024-01-03 10:00:00,mobile,Chrome,Search,/,
2,100,1,category,2024-01-03 10:01:00,mobile,Chrome,Search,/category/jeans,
3,100,1,product,2024-01-03 10:02:00,mobile,Chrome,Search,/product/10,10
4,100,1,cart,2024-01-03 10:03:00,mobile,Chrome,Search,/cart,10
5,100,1,purchase,2024-01-03 10:04:00,mobile,Chrome,Search,/purchase,10
6,101,2,home,2024-01-05 09:00:00,desktop,Firefox,Email,/,
7,101,2,home,not-a-date,desktop,Firefox,Email,/,
";

pub const USERS_CSV: &str = "\
user_id,age,gender,country,state,traffic_source,created_at
1,34,F,United States,California,Search,2023-12-01 08:00:00
2,,M,Brasil,,Email,2023-12-15
";

pub const ORDERS_CSV: &str = "\
order_id,user_id,status,num_of_item,total_sale_price,created_at,traffic_source
10,1,Complete,2,59.5,2024-01-03 10:04:00,Search
11,1,Cancelled,1,20.0,2024-02-01 12:00:00,Search
12,2,,1,,2024-01-05T09:30:00,Email
";

pub const ORDER_ITEMS_CSV: &str = "\
order_item_id,order_id,user_id,product_id,status,sale_price,created_at,shipped_at,returned_at
1000,10,1,10,Complete,29.75,2024-01-03 10:04:00,2024-01-04 10:00:00,
1001,10,1,11,Complete,29.75,2024-01-03 10:04:00,2024-01-04 10:00:00,
";

pub const PRODUCTS_CSV: &str = "\
product_id,product_name,category,brand,retail_price,cost,department
10,Slim Jeans,Jeans,Levi's,29.75,12.1,Women
11,\"Tee, Organic\",Tops,Hanes,29.75,8.0,Men
";

/// Write the five fixture tables into `dir`
pub fn write_fixture(dir: &Path) {
    fs::write(dir.join("events.csv"), EVENTS_CSV).unwrap();
    fs::write(dir.join("users.csv"), USERS_CSV).unwrap();
    fs::write(dir.join("orders.csv"), ORDERS_CSV).unwrap();
    fs::write(dir.join("order_items.csv"), ORDER_ITEMS_CSV).unwrap();
    fs::write(dir.join("products.csv"), PRODUCTS_CSV).unwrap();
}

/// Orders table with `valid` well-formed rows followed by one row whose
/// `user_id`, `num_of_item` and `total_sale_price` do not parse
pub fn orders_with_trailing_bad_row(valid: usize) -> String {
    let mut csv =
        String::from("order_id,user_id,status,num_of_item,total_sale_price,created_at,traffic_source\n");
    for i in 0..valid {
        csv.push_str(&format!(
            "{},{},Complete,1,10.5,2024-01-03 10:04:00,Search\n",
            i + 1,
            i % 50 + 1
        ));
    }
    csv.push_str(&format!(
        "{},abc,Complete,1.0,n/a,2024-01-03 10:04:00,Search\n",
        valid + 1
    ));
    csv
}
