mod objects;

pub use objects::{GetObjectRequest, ObjectsService, PutObjectRequest};
