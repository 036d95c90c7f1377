use crate::config::Opts;
use crate::count::Stat;
use crate::event::EventDesc;
use crate::ffi::{bindings as b, Attr};

pub(crate) fn from(event: &EventDesc, opts: &Opts) -> Attr {
    let mut attr = Attr {
        type_: event.kind.ty(),
        size: b::PERF_ATTR_SIZE_VER1,
        config: event.config,
        ..Default::default()
    };

    macro_rules! when {
        ($bool:expr, $flag:ident) => {
            if $bool {
                attr.flags |= b::$flag;
            }
        };
    }

    when!(opts.exclude.user, ATTR_EXCLUDE_USER);
    when!(opts.exclude.kernel, ATTR_EXCLUDE_KERNEL);
    when!(opts.exclude.hv, ATTR_EXCLUDE_HV);
    when!(opts.exclude.host, ATTR_EXCLUDE_HOST);
    when!(opts.exclude.guest, ATTR_EXCLUDE_GUEST);
    when!(opts.exclude.idle, ATTR_EXCLUDE_IDLE);

    when!(opts.inherit, ATTR_INHERIT);
    when!(opts.pin_on_pmu, ATTR_PINNED);
    when!(opts.only_group, ATTR_EXCLUSIVE);
    when!(opts.enable_on_exec, ATTR_ENABLE_ON_EXEC);
    when!(!opts.enable, ATTR_DISABLED);

    // Timings are always requested, the profile reports them alongside the counts.
    attr.read_format = Stat::READ_FORMAT;

    attr
}
