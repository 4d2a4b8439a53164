pub mod draw_list;

pub use draw_list::{
    build_draw_list, DrawInstance, DrawList, KIND_CIRCLE, KIND_LABEL, KIND_ROUNDED_RECT,
};
