mod link;

pub(crate) use self::link::link_exit;
pub(crate) use self::link::link_expire;
pub(crate) use self::link::link_insert;
pub(crate) use self::link::link_remove;
pub(crate) use self::link::link_signal;
