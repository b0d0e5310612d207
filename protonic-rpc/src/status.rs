use std::error::Error;
use std::fmt;

/// The canonical RPC status codes.
///
/// These values and their numeric assignments match `google.rpc.Code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl Code {
    /// Converts an integer to a `Code`; values outside the canonical set
    /// map to `Unknown`.
    pub fn from_i32(value: i32) -> Code {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }

    /// A human readable description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            Code::Ok => "The operation completed successfully",
            Code::Cancelled => "The operation was cancelled",
            Code::Unknown => "Unknown error",
            Code::InvalidArgument => "Client specified an invalid argument",
            Code::DeadlineExceeded => "Deadline expired before operation could complete",
            Code::NotFound => "Some requested entity was not found",
            Code::AlreadyExists => "Some entity that we attempted to create already exists",
            Code::PermissionDenied => {
                "The caller does not have permission to execute the specified operation"
            }
            Code::ResourceExhausted => "Some resource has been exhausted",
            Code::FailedPrecondition => {
                "The system is not in a state required for the operation's execution"
            }
            Code::Aborted => "The operation was aborted",
            Code::OutOfRange => "Operation was attempted past the valid range",
            Code::Unimplemented => "Operation is not implemented or not supported",
            Code::Internal => "Internal error",
            Code::Unavailable => "The service is currently unavailable",
            Code::DataLoss => "Unrecoverable data loss or corruption",
            Code::Unauthenticated => "The request does not have valid authentication credentials",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The outcome of an RPC, combining a [`Code`] with a message.
///
/// Statuses are propagated end-to-end between the generated client, the
/// transport, and the server implementation; the codec layer never produces
/// them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
}

macro_rules! status_constructors {
    ($($(#[$meta:meta])* $name:ident: $code:ident,)*) => {
        $(
            $(#[$meta])*
            pub fn $name(message: impl Into<String>) -> Status {
                Status::new(Code::$code, message)
            }
        )*
    };
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Status {
        Status {
            code,
            message: message.into(),
        }
    }

    /// The success status.
    pub fn ok() -> Status {
        Status::new(Code::Ok, "")
    }

    status_constructors! {
        /// The operation was cancelled, typically by the caller.
        cancelled: Cancelled,
        /// Unknown error.
        unknown: Unknown,
        /// The client specified an invalid argument.
        invalid_argument: InvalidArgument,
        /// The deadline expired before the operation could complete.
        deadline_exceeded: DeadlineExceeded,
        /// Some requested entity was not found.
        not_found: NotFound,
        /// The entity that a client attempted to create already exists.
        already_exists: AlreadyExists,
        /// The caller does not have permission to execute the operation.
        permission_denied: PermissionDenied,
        /// Some resource has been exhausted.
        resource_exhausted: ResourceExhausted,
        /// The system is not in a state required for the operation.
        failed_precondition: FailedPrecondition,
        /// The operation was aborted.
        aborted: Aborted,
        /// The operation was attempted past the valid range.
        out_of_range: OutOfRange,
        /// The operation is not implemented or not supported.
        unimplemented: Unimplemented,
        /// An internal invariant was broken.
        internal: Internal,
        /// The service is currently unavailable.
        unavailable: Unavailable,
        /// Unrecoverable data loss or corruption.
        data_loss: DataLoss,
        /// The request does not have valid authentication credentials.
        unauthenticated: Unauthenticated,
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "status: {:?}, message: {:?}",
            self.code(),
            self.message()
        )
    }
}

impl Error for Status {}
