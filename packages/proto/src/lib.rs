pub mod checkout {
    tonic::include_proto!("checkout");
}

pub mod orders {
    tonic::include_proto!("orders");
}
