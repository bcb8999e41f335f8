pub mod garman_kohlhagen;
