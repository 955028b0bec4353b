pub mod todo;
pub mod user;

pub use todo::{
    NewTodo, NewTodoRequest, Todo, TodoChanges, TodoStatus, TodoValidationError,
    UpdateTodoRequest,
};
pub use user::{
    Credentials, LoginRequest, NewUser, PublicUser, RegisterRequest, Registration, User,
};
