pub mod tcp_client;
